use tracing::info;

use crate::notifications::NotificationDispatcher;
use crate::store::{LeadRecord, SubmissionStore, sort_newest_first};
use crate::web::error::{AppError, MSG_MISSING_FIELDS};
use crate::web::models::SubmissionRequest;

/// Returns the trimmed value, or `None` if it is missing or blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks that all three fields are present. No format rules are applied.
pub fn validate_submission(req: SubmissionRequest) -> Result<LeadRecord, AppError> {
    match (
        required(req.car_number),
        required(req.car_model),
        required(req.phone_number),
    ) {
        (Some(car_number), Some(car_model), Some(phone_number)) => {
            Ok(LeadRecord::new(car_number, car_model, phone_number))
        }
        _ => Err(AppError::InvalidInput(MSG_MISSING_FIELDS.to_string())),
    }
}

/// Validates, persists and hands the lead to the notifier.
///
/// Success only means the record was stored; notification delivery happens
/// afterwards and cannot fail the submission.
pub async fn accept_submission(
    store: &dyn SubmissionStore,
    notifier: &NotificationDispatcher,
    req: SubmissionRequest,
) -> Result<LeadRecord, AppError> {
    let record = validate_submission(req)?;
    store.append(record.clone()).await?;

    info!(
        lead_id = %record.id,
        car_number = %record.car_number,
        car_model = %record.car_model,
        notify = notifier.is_enabled(),
        "Submission recorded."
    );
    notifier.dispatch(record.clone());
    Ok(record)
}

/// All stored leads, newest first.
pub async fn list_submissions(store: &dyn SubmissionStore) -> Result<Vec<LeadRecord>, AppError> {
    let records = store.read_all().await?;
    Ok(sort_newest_first(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn request(car_number: Option<&str>, car_model: Option<&str>, phone: Option<&str>) -> SubmissionRequest {
        SubmissionRequest {
            car_number: car_number.map(String::from),
            car_model: car_model.map(String::from),
            phone_number: phone.map(String::from),
        }
    }

    #[test]
    fn accepts_three_non_empty_fields() {
        let record = validate_submission(request(
            Some(" 12가3456 "),
            Some("현대 그랜저 2020"),
            Some("010-1234-5678"),
        ))
        .unwrap();
        assert_eq!(record.car_number, "12가3456");
        assert_eq!(record.car_model, "현대 그랜저 2020");
        assert_eq!(record.phone_number, "010-1234-5678");
    }

    #[test]
    fn rejects_missing_or_blank_fields() {
        let cases = [
            request(None, Some("X"), Some("010")),
            request(Some(""), Some("X"), Some("010-0000-0000")),
            request(Some("1"), Some("   "), Some("010")),
            request(Some("1"), Some("X"), None),
            SubmissionRequest::default(),
        ];
        for req in cases {
            match validate_submission(req) {
                Err(AppError::InvalidInput(msg)) => assert_eq!(msg, MSG_MISSING_FIELDS),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn no_format_validation_is_applied() {
        assert!(validate_submission(request(Some("?"), Some("!"), Some("call me"))).is_ok());
    }

    #[tokio::test]
    async fn invalid_submission_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let notifier = NotificationDispatcher::disabled();
        let result = accept_submission(&store, &notifier, request(Some(""), Some("X"), Some("010"))).await;
        assert!(result.is_err());
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accepted_submission_is_listed_first() {
        let store = MemoryStore::new();
        let notifier = NotificationDispatcher::disabled();
        let first = accept_submission(&store, &notifier, request(Some("1"), Some("a"), Some("010")))
            .await
            .unwrap();
        let second = accept_submission(&store, &notifier, request(Some("2"), Some("b"), Some("011")))
            .await
            .unwrap();

        let listed = list_submissions(&store).await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }
}
