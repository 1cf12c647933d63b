//! Document kinds.
//!
//! Invoices and quotations share one structural shape: a header row with a
//! unique client-supplied number plus line items that reference it. The only
//! differences are table naming and two behavioural switches, captured here
//! so the persistence layer can stay generic.

use serde::{Deserialize, Serialize};

/// Which family of document a header or line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Quotation,
}

impl DocumentKind {
    /// Header table.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Invoice => "invoices",
            Self::Quotation => "quotations",
        }
    }

    /// Column (and JSON key) holding the document number.
    #[must_use]
    pub const fn number_column(self) -> &'static str {
        match self {
            Self::Invoice => "invoice_no",
            Self::Quotation => "quotation_no",
        }
    }

    /// Line-item table.
    #[must_use]
    pub const fn line_table(self) -> &'static str {
        match self {
            Self::Invoice => "invoice_items",
            Self::Quotation => "quotation_items",
        }
    }

    /// Foreign-key column on the line-item table.
    #[must_use]
    pub const fn parent_column(self) -> &'static str {
        match self {
            Self::Invoice => "invoice_id",
            Self::Quotation => "quotation_id",
        }
    }

    /// Human label used in audit entries ("Create Invoice").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Quotation => "Quotation",
        }
    }

    /// Whether creating this kind decrements referenced item stock.
    #[must_use]
    pub const fn adjusts_stock(self) -> bool {
        matches!(self, Self::Invoice)
    }

    /// Whether documents of this kind can be deleted.
    ///
    /// Invoices are permanent once issued.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        matches!(self, Self::Quotation)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
