//! The fixed-shape business license record returned to callers.

use serde::Serialize;

/// Mapped business license fields.
///
/// Every field starts empty and is filled by at most one mapping pass;
/// fields the document never populated stay empty strings rather than
/// being omitted, so callers always see the full shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LicenseRecord {
    pub license_id: String,
    pub issuing_office: String,
    pub licensee_name: String,
    pub business_type: String,
    pub region: String,
    pub ward: String,
    pub street: String,
    pub branch_type: String,
    pub amount_paid: String,
    pub issue_date: String,
    pub expiry_date: String,
}
