//! Entity-to-field mapping for business license documents.
//!
//! The extraction service labels repeated spans with the same type key
//! (several `person` entities, two `date_time` entities), so a type key
//! alone does not identify a destination field. The mapper resolves the
//! ambiguity with an explicit rule table: each type key routes to either
//! a single overwritable field or an ordered group of slots filled
//! first-empty-first, in the order the service returned the values.
//!
//! The slot order encodes the service's observed output order for this
//! processor (licensee name before region before ward before street).
//! That ordering is a positional contract with the processor's typical
//! output, not a verified guarantee.

use super::record::LicenseRecord;
use crate::extract::Entity;

/// Fixed cutoff below which extracted values are discarded.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Destination fields a rule can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    LicenseId,
    IssuingOffice,
    LicenseeName,
    BusinessType,
    Region,
    Ward,
    Street,
    BranchType,
    AmountPaid,
    IssueDate,
    ExpiryDate,
}

impl Field {
    fn get(self, record: &LicenseRecord) -> &str {
        match self {
            Self::LicenseId => &record.license_id,
            Self::IssuingOffice => &record.issuing_office,
            Self::LicenseeName => &record.licensee_name,
            Self::BusinessType => &record.business_type,
            Self::Region => &record.region,
            Self::Ward => &record.ward,
            Self::Street => &record.street,
            Self::BranchType => &record.branch_type,
            Self::AmountPaid => &record.amount_paid,
            Self::IssueDate => &record.issue_date,
            Self::ExpiryDate => &record.expiry_date,
        }
    }

    fn set(self, record: &mut LicenseRecord, value: &str) {
        let slot = match self {
            Self::LicenseId => &mut record.license_id,
            Self::IssuingOffice => &mut record.issuing_office,
            Self::LicenseeName => &mut record.licensee_name,
            Self::BusinessType => &mut record.business_type,
            Self::Region => &mut record.region,
            Self::Ward => &mut record.ward,
            Self::Street => &mut record.street,
            Self::BranchType => &mut record.branch_type,
            Self::AmountPaid => &mut record.amount_paid,
            Self::IssueDate => &mut record.issue_date,
            Self::ExpiryDate => &mut record.expiry_date,
        };
        value.clone_into(slot);
    }
}

/// How occurrences of one type key are routed to fields.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// One destination; every occurrence writes it (last write wins).
    Overwrite(Field),
    /// Fill slots first-empty-first; once full, further occurrences
    /// overwrite the last slot.
    FillThenOverwriteLast(&'static [Field]),
    /// Fill slots first-empty-first; once full, further occurrences are
    /// dropped.
    FillThenDrop(&'static [Field]),
}

/// Routing table keyed by the service's entity type labels.
fn rule_for(entity_type: &str) -> Option<Rule> {
    match entity_type {
        "id" => Some(Rule::Overwrite(Field::LicenseId)),
        "organization" => Some(Rule::FillThenOverwriteLast(&[
            Field::IssuingOffice,
            Field::BusinessType,
        ])),
        "person" => Some(Rule::FillThenDrop(&[
            Field::LicenseeName,
            Field::Region,
            Field::Ward,
            Field::Street,
        ])),
        "price" => Some(Rule::Overwrite(Field::AmountPaid)),
        "date_time" => Some(Rule::FillThenDrop(&[Field::IssueDate, Field::ExpiryDate])),
        "branch_type" => Some(Rule::Overwrite(Field::BranchType)),
        _ => None,
    }
}

/// Maps an extracted entity list onto a [`LicenseRecord`].
///
/// Pure and deterministic: the output depends only on the entity list and
/// the confidence threshold, so mapping the same list twice yields the
/// same record.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    threshold: f32,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    /// Create a mapper with the standard confidence threshold.
    pub fn new() -> Self {
        Self {
            threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// Create a mapper with a custom threshold.
    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Map entities onto a fresh record, visiting them in service order.
    pub fn map(&self, entities: &[Entity]) -> LicenseRecord {
        let mut record = LicenseRecord::default();
        for entity in entities {
            self.visit(entity, &mut record);
        }
        record
    }

    /// Visit one entity. Entities with nested properties are containers:
    /// the properties are the mapping units, not the parent. Flat entities
    /// map directly.
    fn visit(&self, entity: &Entity, record: &mut LicenseRecord) {
        if entity.properties.is_empty() {
            self.apply(entity, record);
        } else {
            for property in &entity.properties {
                self.visit(property, record);
            }
        }
    }

    fn apply(&self, entity: &Entity, record: &mut LicenseRecord) {
        // Silent data-quality filter, not an error.
        if entity.confidence < self.threshold || entity.mention_text.is_empty() {
            return;
        }

        let Some(rule) = rule_for(&entity.entity_type) else {
            return;
        };

        match rule {
            Rule::Overwrite(field) => field.set(record, &entity.mention_text),
            Rule::FillThenOverwriteLast(fields) => {
                let target = fields
                    .iter()
                    .copied()
                    .find(|f| f.get(record).is_empty())
                    .or_else(|| fields.last().copied());
                if let Some(field) = target {
                    field.set(record, &entity.mention_text);
                }
            }
            Rule::FillThenDrop(fields) => {
                if let Some(field) = fields.iter().copied().find(|f| f.get(record).is_empty()) {
                    field.set(record, &entity.mention_text);
                }
            }
        }
    }
}
