//! Stub collaborators shared by the routing unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::crm::ContactDirectory;
use crate::error::{CrmError, TelephonyError};
use crate::routing::types::{Contact, Owner, TelephonyAgent, TransferCommand};
use crate::telephony::CallPlatform;

/// In-memory CRM that counts calls.
#[derive(Default)]
pub struct StubCrm {
    pub contact: Option<Contact>,
    pub owner_email: Option<String>,
    pub fail_search: bool,
    pub panic_on_search: bool,
    pub fail_owner: bool,
    pub searches: Mutex<Vec<String>>,
    pub owner_lookups: AtomicUsize,
}

impl StubCrm {
    pub fn with_contact(first_name: &str, owner_id: Option<&str>) -> Self {
        Self {
            contact: Some(Contact {
                first_name: first_name.into(),
                owner_id: owner_id.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    pub fn owner_email(mut self, email: &str) -> Self {
        self.owner_email = Some(email.into());
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn owner_lookup_count(&self) -> usize {
        self.owner_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactDirectory for StubCrm {
    async fn search_contact_by_phone(&self, phone: &str) -> Result<Option<Contact>, CrmError> {
        self.searches.lock().unwrap().push(phone.to_string());
        if self.panic_on_search {
            panic!("contact search exploded");
        }
        if self.fail_search {
            return Err(CrmError::RequestFailed {
                operation: "contact search".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(self.contact.clone())
    }

    async fn get_owner(&self, _owner_id: &str) -> Result<Owner, CrmError> {
        self.owner_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_owner {
            return Err(CrmError::Status {
                operation: "owner lookup".into(),
                status: 404,
                body: "not found".into(),
            });
        }
        Ok(Owner {
            email: self.owner_email.clone(),
        })
    }
}

/// In-memory telephony platform that records transfers.
#[derive(Default)]
pub struct StubPlatform {
    pub users: Vec<TelephonyAgent>,
    pub fail_listing: bool,
    pub fail_transfer: bool,
    pub listings: AtomicUsize,
    pub transfers: Mutex<Vec<TransferCommand>>,
}

impl StubPlatform {
    pub fn with_users(users: Vec<TelephonyAgent>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn listing_count(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    pub fn transfers(&self) -> Vec<TransferCommand> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallPlatform for StubPlatform {
    async fn list_users(&self) -> Result<Vec<TelephonyAgent>, TelephonyError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(TelephonyError::InvalidResponse {
                operation: "list users".into(),
                reason: "expected value at line 1".into(),
            });
        }
        Ok(self.users.clone())
    }

    async fn transfer_call(&self, command: &TransferCommand) -> Result<(), TelephonyError> {
        self.transfers.lock().unwrap().push(command.clone());
        if self.fail_transfer {
            return Err(TelephonyError::Status {
                operation: "transfer call".into(),
                status: 422,
                body: "call already ended".into(),
            });
        }
        Ok(())
    }
}

pub fn agent(id: &str, email: &str, available: bool, status: &str) -> TelephonyAgent {
    TelephonyAgent {
        id: id.into(),
        email: email.into(),
        available,
        availability_status: status.into(),
    }
}
