use ticketgate_core::IncidentRequest;

/// Best-effort contact resolution.
///
/// Current policy is literal passthrough of the payload's email field.
/// Deliberately no remote directory reads here: the directory tables are
/// not guaranteed to exist on every instance, and the intake path must not
/// issue speculative remote calls. A future lookup would go through the
/// ticket store port.
pub fn resolve_contact(request: &IncidentRequest) -> Option<String> {
    let email = request.email.trim();
    if email.is_empty() {
        None
    } else {
        Some(email.to_string())
    }
}
