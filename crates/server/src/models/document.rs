//! Invoice and quotation documents.
//!
//! Both kinds share one shape. JSON keys that depend on the kind
//! (`invoice_no` vs `quotation_no`, `invoice_id` vs `quotation_id`) are
//! produced by the hand-written `Serialize` impls below.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use ledgerdesk_core::{CustomerId, DocumentId, DocumentKind, ItemId, LineItemId};

/// A document header joined to its customer's name.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    pub kind: DocumentKind,
    pub id: DocumentId,
    pub number: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub date: Option<String>,
    pub subtotal: Option<f64>,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    pub tax_percent: Option<f64>,
    pub service_charge: Option<f64>,
    pub grand_total: Option<f64>,
    /// `None` when the document has no customer or the customer is gone.
    pub customer_name: Option<String>,
}

impl DocumentHeader {
    /// Map entries written by `write_fields`.
    const SERIALIZED_ENTRIES: usize = 11;

    fn write_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(self.kind.number_column(), &self.number)?;
        map.serialize_entry("customer_id", &self.customer_id)?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("subtotal", &self.subtotal)?;
        map.serialize_entry("discount_percent", &self.discount_percent)?;
        map.serialize_entry("discount_amount", &self.discount_amount)?;
        map.serialize_entry("tax_percent", &self.tax_percent)?;
        map.serialize_entry("service_charge", &self.service_charge)?;
        map.serialize_entry("grand_total", &self.grand_total)?;
        map.serialize_entry("customer_name", &self.customer_name)?;
        Ok(())
    }
}

impl Serialize for DocumentHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Self::SERIALIZED_ENTRIES))?;
        self.write_fields(&mut map)?;
        map.end()
    }
}

/// A header with customer contact details and all of its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDetail {
    pub header: DocumentHeader,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub items: Vec<LineItem>,
}

impl Serialize for DocumentDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DocumentHeader::SERIALIZED_ENTRIES + 3))?;
        self.header.write_fields(&mut map)?;
        map.serialize_entry("phone", &self.phone)?;
        map.serialize_entry("address", &self.address)?;
        map.serialize_entry("items", &self.items)?;
        map.end()
    }
}

/// A stored line item. `item_name` is a copy taken at creation time, not a
/// live reference to the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub kind: DocumentKind,
    pub id: LineItemId,
    pub document_id: Option<DocumentId>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub qty: Option<i64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
}

impl Serialize for LineItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(self.kind.parent_column(), &self.document_id)?;
        map.serialize_entry("item_name", &self.item_name)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("qty", &self.qty)?;
        map.serialize_entry("price", &self.price)?;
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// Request body for creating a document.
///
/// Totals are taken as sent; the server does not recompute them.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    #[serde(alias = "invoice_no", alias = "quotation_no", alias = "document_no")]
    pub number: String,
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub customer_id: Option<CustomerId>,
    pub date: Option<String>,
    pub subtotal: Option<f64>,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    #[serde(default, rename = "tax", alias = "tax_percent")]
    pub tax_percent: Option<f64>,
    #[serde(default, rename = "service", alias = "service_charge")]
    pub service_charge: Option<f64>,
    pub grand_total: Option<f64>,
    #[serde(default)]
    pub items: Vec<NewLineItem>,
}

/// One line of a new document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLineItem {
    /// Catalogue item whose stock an invoice line draws down.
    #[serde(default, rename = "id", deserialize_with = "super::lenient_id")]
    pub item_id: Option<ItemId>,
    #[serde(alias = "item_name")]
    pub name: Option<String>,
    #[serde(default, rename = "desc", alias = "description")]
    pub description: Option<String>,
    pub qty: Option<i64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn header(kind: DocumentKind) -> DocumentHeader {
        DocumentHeader {
            kind,
            id: DocumentId::new(1),
            number: Some("Q-7".to_string()),
            customer_id: None,
            date: Some("2024-05-01".to_string()),
            subtotal: Some(20.0),
            discount_percent: Some(0.0),
            discount_amount: Some(0.0),
            tax_percent: Some(0.0),
            service_charge: Some(0.0),
            grand_total: Some(20.0),
            customer_name: None,
        }
    }

    #[test]
    fn test_header_uses_kind_specific_number_key() {
        let quotation = serde_json::to_value(header(DocumentKind::Quotation)).unwrap();
        assert_eq!(quotation["quotation_no"], "Q-7");
        assert!(quotation.get("invoice_no").is_none());
        assert_eq!(quotation["customer_name"], serde_json::Value::Null);

        let invoice = serde_json::to_value(header(DocumentKind::Invoice)).unwrap();
        assert_eq!(invoice["invoice_no"], "Q-7");
        assert_eq!(
            invoice.as_object().unwrap().len(),
            DocumentHeader::SERIALIZED_ENTRIES
        );
    }

    #[test]
    fn test_detail_embeds_items_with_parent_key() {
        let detail = DocumentDetail {
            header: header(DocumentKind::Invoice),
            phone: Some("555".to_string()),
            address: None,
            items: vec![LineItem {
                kind: DocumentKind::Invoice,
                id: LineItemId::new(10),
                document_id: Some(DocumentId::new(1)),
                item_name: Some("Widget".to_string()),
                description: None,
                qty: Some(4),
                price: Some(5.0),
                total: Some(20.0),
            }],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["phone"], "555");
        assert_eq!(value["items"][0]["invoice_id"], 1);
        assert_eq!(value["items"][0]["item_name"], "Widget");
        assert_eq!(
            value.as_object().unwrap().len(),
            DocumentHeader::SERIALIZED_ENTRIES + 3
        );
    }

    #[test]
    fn test_new_document_accepts_front_end_field_names() {
        let doc: NewDocument = serde_json::from_value(json!({
            "invoice_no": "INV-1",
            "customer_id": "3",
            "date": "2024-05-01",
            "subtotal": 20,
            "tax": 5,
            "service": 1.5,
            "grand_total": 26.5,
            "items": [
                {"id": 2, "name": "Widget", "desc": "Blue", "qty": 4, "price": 5, "total": 20},
                {"id": "", "name": "Labour", "qty": 1, "price": 0, "total": 0}
            ]
        }))
        .unwrap();

        assert_eq!(doc.number, "INV-1");
        assert_eq!(doc.customer_id, Some(CustomerId::new(3)));
        assert_eq!(doc.tax_percent, Some(5.0));
        assert_eq!(doc.service_charge, Some(1.5));
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].item_id, Some(ItemId::new(2)));
        assert_eq!(doc.items[0].description.as_deref(), Some("Blue"));
        assert_eq!(doc.items[1].item_id, None);
    }

    #[test]
    fn test_new_document_without_customer() {
        let doc: NewDocument =
            serde_json::from_value(json!({"quotation_no": "Q-1", "customer_id": null})).unwrap();
        assert_eq!(doc.customer_id, None);
        assert!(doc.items.is_empty());
    }
}
