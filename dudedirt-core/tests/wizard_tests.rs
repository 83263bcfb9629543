// tests/wizard_tests.rs

use std::sync::Arc;
use std::time::Duration;

use dudedirt_common::traits::repository_traits::CatalogRepository;
use dudedirt_core::Error;
use dudedirt_core::db::Database;
use dudedirt_core::repositories::sqlite::SqliteCatalogRepository;
use dudedirt_core::services::{StepData, WizardStatus, WizardStep, WizardStore};
use dudedirt_core::test_utils::helpers::{create_test_user, future_slot, setup_test_database};

fn wizard_store(db: &Database, timeout_minutes: i64) -> Arc<WizardStore> {
    let catalog: Arc<dyn CatalogRepository> =
        Arc::new(SqliteCatalogRepository::new(db.pool().clone()));
    Arc::new(WizardStore::new(catalog, timeout_minutes))
}

#[tokio::test]
async fn wizard_walks_all_four_steps() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "carol").await?;

    let handle = store.start(user.user_id);
    let state = store.get_state(handle)?;
    assert_eq!(
        state.status,
        WizardStatus::InProgress(WizardStep::ServiceSelection)
    );

    let state = store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 2 })
        .await?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::AddOns));
    assert_eq!(state.service_id, Some(2));

    let state = store
        .set_step_data(
            handle,
            StepData::AddOns {
                product_ids: vec![1, 3],
            },
        )
        .await?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::Schedule));

    let slot = future_slot(3);
    let state = store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: slot,
                special_instructions: Some("Gate code 4242".to_string()),
            },
        )
        .await?;
    assert_eq!(
        state.status,
        WizardStatus::InProgress(WizardStep::Confirmation)
    );
    assert_eq!(state.scheduled_at, Some(slot));
    assert_eq!(state.special_instructions.as_deref(), Some("Gate code 4242"));

    Ok(())
}

#[tokio::test]
async fn invalid_input_names_the_field_and_does_not_advance() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "dan").await?;
    let handle = store.start(user.user_id);

    // Unknown service.
    let result = store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 99 })
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "service_id"
    ));
    let state = store.get_state(handle)?;
    assert_eq!(
        state.status,
        WizardStatus::InProgress(WizardStep::ServiceSelection)
    );
    assert_eq!(state.service_id, None);

    // Jumping ahead of the current step is rejected outright.
    let result = store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: future_slot(1),
                special_instructions: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "step"
    ));

    Ok(())
}

#[tokio::test]
async fn schedule_rejects_past_and_after_hours_slots() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "erin").await?;
    let handle = store.start(user.user_id);

    store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 1 })
        .await?;
    store
        .set_step_data(handle, StepData::AddOns { product_ids: vec![] })
        .await?;

    let past = future_slot(-2);
    let result = store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: past,
                special_instructions: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "scheduled_at"
    ));

    let midnight = future_slot(2)
        .date_naive()
        .and_hms_opt(23, 0, 0)
        .expect("valid time")
        .and_utc();
    let result = store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: midnight,
                special_instructions: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation { ref field, .. }) if field == "scheduled_at"
    ));

    // Still waiting at the schedule step.
    let state = store.get_state(handle)?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::Schedule));

    Ok(())
}

#[tokio::test]
async fn stepping_back_preserves_everything_entered() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "fred").await?;
    let handle = store.start(user.user_id);

    store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 3 })
        .await?;
    store
        .set_step_data(
            handle,
            StepData::AddOns {
                product_ids: vec![5],
            },
        )
        .await?;

    // Back to add-ons, swap the selection, and move forward again.
    let state = store.back(handle)?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::AddOns));
    assert_eq!(state.service_id, Some(3));
    assert_eq!(state.product_ids, vec![5]);

    let state = store
        .set_step_data(
            handle,
            StepData::AddOns {
                product_ids: vec![2, 6],
            },
        )
        .await?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::Schedule));
    assert_eq!(state.service_id, Some(3));
    assert_eq!(state.product_ids, vec![2, 6]);

    Ok(())
}

#[tokio::test]
async fn schedule_details_survive_a_back_and_return_cycle() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "iris").await?;
    let handle = store.start(user.user_id);

    store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 4 })
        .await?;
    store
        .set_step_data(
            handle,
            StepData::AddOns {
                product_ids: vec![1],
            },
        )
        .await?;
    let slot = future_slot(5);
    store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: slot,
                special_instructions: Some("Side gate".to_string()),
            },
        )
        .await?;

    // Two steps back to add-ons; the schedule details stay put.
    store.back(handle)?;
    let state = store.back(handle)?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::AddOns));
    assert_eq!(state.scheduled_at, Some(slot));
    assert_eq!(state.special_instructions.as_deref(), Some("Side gate"));

    // Re-submitting add-ons moves forward again without touching them.
    let state = store
        .set_step_data(
            handle,
            StepData::AddOns {
                product_ids: vec![1, 2],
            },
        )
        .await?;
    assert_eq!(state.status, WizardStatus::InProgress(WizardStep::Schedule));
    assert_eq!(state.scheduled_at, Some(slot));
    assert_eq!(state.special_instructions.as_deref(), Some("Side gate"));

    // Only an explicit re-submission of the schedule overwrites them.
    let new_slot = future_slot(6);
    let state = store
        .set_step_data(
            handle,
            StepData::Schedule {
                scheduled_at: new_slot,
                special_instructions: None,
            },
        )
        .await?;
    assert_eq!(state.scheduled_at, Some(new_slot));
    assert_eq!(state.special_instructions, None);

    Ok(())
}

#[tokio::test]
async fn idle_wizard_expires_lazily_and_is_swept() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 0);
    let user = create_test_user(&db, "gail").await?;
    let handle = store.start(user.user_id);

    tokio::time::sleep(Duration::from_millis(20)).await;

    // Lazy check on access flips the entry to abandoned.
    let state = store.get_state(handle)?;
    assert_eq!(state.status, WizardStatus::Abandoned);

    let result = store
        .set_step_data(handle, StepData::ServiceSelection { service_id: 1 })
        .await;
    assert!(matches!(result, Err(Error::WizardExpired)));

    // The sweep evicts the entry entirely.
    assert_eq!(store.sweep(), 1);
    assert!(matches!(store.get_state(handle), Err(Error::WizardExpired)));

    Ok(())
}

#[tokio::test]
async fn starting_again_abandons_the_previous_wizard() -> Result<(), Error> {
    let db = setup_test_database().await?;
    let store = wizard_store(&db, 30);
    let user = create_test_user(&db, "hank").await?;

    let first = store.start(user.user_id);
    store
        .set_step_data(first, StepData::ServiceSelection { service_id: 1 })
        .await?;

    let second = store.start(user.user_id);
    assert_ne!(first, second);

    let old = store.get_state(first)?;
    assert_eq!(old.status, WizardStatus::Abandoned);
    let new = store.get_state(second)?;
    assert_eq!(
        new.status,
        WizardStatus::InProgress(WizardStep::ServiceSelection)
    );

    Ok(())
}
