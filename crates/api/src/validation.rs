use ticketgate_core::rules::CATEGORIES;
use ticketgate_core::IncidentRequest;

use crate::error::ApiError;

const MAX_SHORT_DESCRIPTION: usize = 160;
const MAX_DESCRIPTION: usize = 4000;

/// Reject malformed intake payloads before any remote call is made.
pub fn validate_incident_request(request: &IncidentRequest) -> Result<(), ApiError> {
    let short = request.short_description.trim();
    if short.is_empty() {
        return Err(ApiError::BadRequest(
            "short_description is required".to_string(),
        ));
    }
    if short.len() > MAX_SHORT_DESCRIPTION {
        return Err(ApiError::BadRequest(format!(
            "short_description exceeds {MAX_SHORT_DESCRIPTION} characters"
        )));
    }
    if request.description.len() > MAX_DESCRIPTION {
        return Err(ApiError::BadRequest(format!(
            "description exceeds {MAX_DESCRIPTION} characters"
        )));
    }
    if !CATEGORIES.contains(&request.category.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "category must be one of: {}",
            CATEGORIES.join(", ")
        )));
    }

    let email = request.email.trim();
    if !email.is_empty() && (!email.contains('@') || email.starts_with('@') || email.ends_with('@'))
    {
        return Err(ApiError::BadRequest(
            "email does not look like an address".to_string(),
        ));
    }
    Ok(())
}
