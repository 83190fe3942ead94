//! Order records and the required-field contract

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

/// One delivery order parsed from an uploaded file
///
/// Only ever built from a row whose five required fields are non-empty after
/// trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub address: String,
    pub phone_number: String,
    pub items: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Columns every uploaded file must provide, in canonical reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "customerName")]
    CustomerName,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "phoneNumber")]
    PhoneNumber,
    #[serde(rename = "items")]
    Items,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::Id,
        RequiredField::CustomerName,
        RequiredField::Address,
        RequiredField::PhoneNumber,
        RequiredField::Items,
    ];

    /// Header name as it appears in the CSV file
    pub fn header(&self) -> &'static str {
        match self {
            RequiredField::Id => "id",
            RequiredField::CustomerName => "customerName",
            RequiredField::Address => "address",
            RequiredField::PhoneNumber => "phoneNumber",
            RequiredField::Items => "items",
        }
    }

    /// Resolve a header or struct field name (`customerName` or `customer_name`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(RequiredField::Id),
            "customerName" | "customer_name" => Some(RequiredField::CustomerName),
            "address" => Some(RequiredField::Address),
            "phoneNumber" | "phone_number" => Some(RequiredField::PhoneNumber),
            "items" => Some(RequiredField::Items),
            _ => None,
        }
    }

    /// Comma-join header names, e.g. `"address, phoneNumber"`
    pub fn join(fields: &[RequiredField]) -> String {
        fields
            .iter()
            .map(RequiredField::header)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A trimmed data row as deserialized from the CSV, before the
/// required-field check
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderRow {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub items: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderRow {
    /// Check the required fields, returning the empty ones in canonical order
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => Self::fields_from(&errors),
        }
    }

    fn fields_from(errors: &ValidationErrors) -> Vec<RequiredField> {
        let mut fields: Vec<RequiredField> = errors
            .field_errors()
            .keys()
            .filter_map(|name| RequiredField::from_name(name))
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            address: row.address,
            phone_number: row.phone_number,
            items: row.items,
            notes: row.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> OrderRow {
        OrderRow {
            id: "ORD001".to_string(),
            customer_name: "John Smith".to_string(),
            address: "123 Main St".to_string(),
            phone_number: "+1234567890".to_string(),
            items: "2x Laptop".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_complete_row_has_no_missing_fields() {
        assert!(row().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_in_canonical_order() {
        let mut r = row();
        r.items = String::new();
        r.id = String::new();
        r.phone_number = String::new();

        assert_eq!(
            r.missing_fields(),
            vec![
                RequiredField::Id,
                RequiredField::PhoneNumber,
                RequiredField::Items
            ]
        );
    }

    #[test]
    fn test_notes_are_not_required() {
        let mut r = row();
        r.notes = Some(String::new());
        assert!(r.missing_fields().is_empty());
    }

    #[test]
    fn test_from_name_accepts_both_spellings() {
        assert_eq!(
            RequiredField::from_name("customerName"),
            Some(RequiredField::CustomerName)
        );
        assert_eq!(
            RequiredField::from_name("phone_number"),
            Some(RequiredField::PhoneNumber)
        );
        assert_eq!(RequiredField::from_name("notes"), None);
    }

    #[test]
    fn test_order_serializes_camel_case_without_empty_notes() {
        let order = Order::from(row());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["customerName"], "John Smith");
        assert_eq!(json["phoneNumber"], "+1234567890");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_required_field_serializes_as_header() {
        let json = serde_json::to_string(&RequiredField::CustomerName).unwrap();
        assert_eq!(json, "\"customerName\"");
    }
}
