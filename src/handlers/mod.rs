// HTTP handlers, one module per resource.
//
// Public:    GET /, GET /health, GET /shops, GET /shops/:id
// Protected: POST /shops, PUT|DELETE /shops/:id, PATCH /shops/:id/toggle-status,
//            GET|PUT /users/:id
pub mod form;
pub mod shops;
pub mod system;
pub mod users;

use uuid::Uuid;

use crate::database::RecordKind;
use crate::error::ApiError;

/// Path ids that are not valid uuids cannot name a record, so they are a 404.
pub(crate) fn parse_id(raw: &str, kind: RecordKind) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", kind)))
}
