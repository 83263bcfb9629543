// File: dudedirt-core/src/services/booking_wizard.rs
//
// In-progress booking state for one user session, across four ordered steps:
// service selection -> product add-ons -> date/time -> confirmation. Nothing
// is persisted until the finalizer commits; entries live in a keyed map with
// an inactivity expiry (lazy check on access plus a background sweep).

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use dudedirt_common::traits::repository_traits::CatalogRepository;

use crate::Error;

/// Opaque key for one booking attempt.
pub type WizardHandle = Uuid;

/// Earliest and latest bookable hour of day (UTC).
const OPEN_HOUR: u32 = 8;
const CLOSE_HOUR: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    ServiceSelection,
    AddOns,
    Schedule,
    Confirmation,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::ServiceSelection => 1,
            WizardStep::AddOns => 2,
            WizardStep::Schedule => 3,
            WizardStep::Confirmation => 4,
        }
    }

    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::ServiceSelection => Some(WizardStep::AddOns),
            WizardStep::AddOns => Some(WizardStep::Schedule),
            WizardStep::Schedule => Some(WizardStep::Confirmation),
            WizardStep::Confirmation => None,
        }
    }

    fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::ServiceSelection => None,
            WizardStep::AddOns => Some(WizardStep::ServiceSelection),
            WizardStep::Schedule => Some(WizardStep::AddOns),
            WizardStep::Confirmation => Some(WizardStep::Schedule),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    InProgress(WizardStep),
    Committed,
    Abandoned,
}

/// Data submitted for a single step. The step it belongs to is implied by
/// the variant; there is no payload for the confirmation step, which is the
/// commit call itself.
#[derive(Debug, Clone)]
pub enum StepData {
    ServiceSelection {
        service_id: i64,
    },
    AddOns {
        product_ids: Vec<i64>,
    },
    Schedule {
        scheduled_at: DateTime<Utc>,
        special_instructions: Option<String>,
    },
}

impl StepData {
    fn step(&self) -> WizardStep {
        match self {
            StepData::ServiceSelection { .. } => WizardStep::ServiceSelection,
            StepData::AddOns { .. } => WizardStep::AddOns,
            StepData::Schedule { .. } => WizardStep::Schedule,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardState {
    pub handle: WizardHandle,
    pub user_id: Uuid,
    pub status: WizardStatus,
    pub service_id: Option<i64>,
    pub product_ids: Vec<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub special_instructions: Option<String>,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

pub struct WizardStore {
    wizards: DashMap<WizardHandle, WizardState>,
    catalog: Arc<dyn CatalogRepository>,
    timeout: Duration,
}

impl WizardStore {
    pub fn new(catalog: Arc<dyn CatalogRepository>, timeout_minutes: i64) -> Self {
        Self {
            wizards: DashMap::new(),
            catalog,
            timeout: Duration::minutes(timeout_minutes),
        }
    }

    /// Begin a new booking attempt. A user gets one live wizard at a time;
    /// starting again abandons the previous attempt.
    pub fn start(&self, user_id: Uuid) -> WizardHandle {
        self.abandon_for_user(user_id);

        let handle = Uuid::new_v4();
        let now = Utc::now();
        self.wizards.insert(
            handle,
            WizardState {
                handle,
                user_id,
                status: WizardStatus::InProgress(WizardStep::ServiceSelection),
                service_id: None,
                product_ids: Vec::new(),
                scheduled_at: None,
                special_instructions: None,
                started_at: now,
                last_active: now,
            },
        );
        debug!("started booking wizard {} for user {}", handle, user_id);
        handle
    }

    /// Submit data for the current step (advances on success) or re-submit an
    /// earlier step (overwrites that field, keeps everything entered later).
    /// Invalid input fails with `Validation` naming the field and the wizard
    /// does not advance.
    pub async fn set_step_data(
        &self,
        handle: WizardHandle,
        data: StepData,
    ) -> Result<WizardState, Error> {
        let snapshot = self.snapshot(handle)?;
        let current = match snapshot.status {
            WizardStatus::InProgress(step) => step,
            WizardStatus::Committed => return Err(Error::AlreadyCommitted),
            WizardStatus::Abandoned => return Err(Error::WizardExpired),
        };

        let target = data.step();
        if target > current {
            return Err(Error::validation(
                "step",
                format!("complete step {} first", current.number()),
            ));
        }

        // Catalog lookups happen on a detached snapshot; the map entry is
        // only locked again for the write below.
        self.validate(&data).await?;

        let mut entry = self.wizards.get_mut(&handle).ok_or(Error::WizardExpired)?;
        match data {
            StepData::ServiceSelection { service_id } => entry.service_id = Some(service_id),
            StepData::AddOns { product_ids } => entry.product_ids = product_ids,
            StepData::Schedule {
                scheduled_at,
                special_instructions,
            } => {
                entry.scheduled_at = Some(scheduled_at);
                entry.special_instructions = special_instructions;
            }
        }
        if target == current {
            if let Some(next) = current.next() {
                entry.status = WizardStatus::InProgress(next);
            }
        }
        entry.last_active = Utc::now();
        Ok(entry.clone())
    }

    /// Step back one step. Always permitted; discards no data.
    pub fn back(&self, handle: WizardHandle) -> Result<WizardState, Error> {
        let snapshot = self.snapshot(handle)?;
        let current = match snapshot.status {
            WizardStatus::InProgress(step) => step,
            WizardStatus::Committed => return Err(Error::AlreadyCommitted),
            WizardStatus::Abandoned => return Err(Error::WizardExpired),
        };

        let mut entry = self.wizards.get_mut(&handle).ok_or(Error::WizardExpired)?;
        if let Some(prev) = current.prev() {
            entry.status = WizardStatus::InProgress(prev);
        }
        entry.last_active = Utc::now();
        Ok(entry.clone())
    }

    pub fn get_state(&self, handle: WizardHandle) -> Result<WizardState, Error> {
        self.snapshot(handle)
    }

    /// Abandon the wizard explicitly (logout).
    pub fn abandon(&self, handle: WizardHandle) {
        if let Some(mut entry) = self.wizards.get_mut(&handle) {
            if matches!(entry.status, WizardStatus::InProgress(_)) {
                entry.status = WizardStatus::Abandoned;
            }
        }
    }

    pub fn abandon_for_user(&self, user_id: Uuid) {
        for mut entry in self.wizards.iter_mut() {
            if entry.user_id == user_id && matches!(entry.status, WizardStatus::InProgress(_)) {
                entry.status = WizardStatus::Abandoned;
            }
        }
    }

    /// Evict entries idle past the timeout, terminal ones included. Returns
    /// the number removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let timeout = self.timeout;
        let before = self.wizards.len();
        self.wizards.retain(|_, w| now - w.last_active <= timeout);
        before - self.wizards.len()
    }

    /// Flip the entry to committed. A missing entry is fine: the booking is
    /// already persisted, and the sweeper may have evicted the wizard in the
    /// meantime.
    pub(crate) fn mark_committed(&self, handle: WizardHandle) {
        if let Some(mut entry) = self.wizards.get_mut(&handle) {
            entry.status = WizardStatus::Committed;
            entry.last_active = Utc::now();
        }
    }

    /// Clone of the entry, lazily flipping it to Abandoned when the
    /// inactivity timeout has elapsed. Unknown (or already swept) handles
    /// surface as expired.
    fn snapshot(&self, handle: WizardHandle) -> Result<WizardState, Error> {
        let mut entry = self.wizards.get_mut(&handle).ok_or(Error::WizardExpired)?;
        if matches!(entry.status, WizardStatus::InProgress(_))
            && Utc::now() - entry.last_active > self.timeout
        {
            entry.status = WizardStatus::Abandoned;
        }
        Ok(entry.clone())
    }

    async fn validate(&self, data: &StepData) -> Result<(), Error> {
        match data {
            StepData::ServiceSelection { service_id } => {
                match self.catalog.get_service(*service_id).await? {
                    Some(service) if service.active => Ok(()),
                    _ => Err(Error::validation(
                        "service_id",
                        format!("unknown or inactive service {}", service_id),
                    )),
                }
            }
            StepData::AddOns { product_ids } => {
                for product_id in product_ids {
                    if self.catalog.get_product(*product_id).await?.is_none() {
                        return Err(Error::validation(
                            "product_ids",
                            format!("unknown product {}", product_id),
                        ));
                    }
                }
                Ok(())
            }
            StepData::Schedule { scheduled_at, .. } => {
                if *scheduled_at <= Utc::now() {
                    return Err(Error::validation(
                        "scheduled_at",
                        "the requested date/time must be in the future",
                    ));
                }
                let hour = scheduled_at.hour();
                if !(OPEN_HOUR..CLOSE_HOUR).contains(&hour) {
                    return Err(Error::validation(
                        "scheduled_at",
                        format!(
                            "outside bookable hours ({:02}:00-{:02}:00)",
                            OPEN_HOUR, CLOSE_HOUR
                        ),
                    ));
                }
                Ok(())
            }
        }
    }
}
