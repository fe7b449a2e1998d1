// src/models.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// File metadata echoed back to the client. The raw bytes never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub image_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&UploadedImage> for FileInfo {
    fn from(image: &UploadedImage) -> Self {
        Self {
            image_id: image.id,
            filename: image.filename.clone(),
            content_type: image.content_type.clone(),
            size: image.size,
            uploaded_at: image.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    HighlyComplex,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [
        Complexity::Simple,
        Complexity::Moderate,
        Complexity::Complex,
        Complexity::HighlyComplex,
    ];

    /// Base price in whole dollars for one traced image.
    pub fn base_price(self) -> Decimal {
        match self {
            Complexity::Simple => Decimal::from(5),
            Complexity::Moderate => Decimal::from(12),
            Complexity::Complex => Decimal::from(25),
            Complexity::HighlyComplex => Decimal::from(50),
        }
    }

    pub fn turnaround_hours(self) -> u32 {
        match self {
            Complexity::Simple => 24,
            Complexity::Moderate => 18,
            Complexity::Complex => 24,
            Complexity::HighlyComplex => 48,
        }
    }

    /// Inclusive bounds for the estimated colour count.
    pub fn color_range(self) -> (u32, u32) {
        match self {
            Complexity::Simple => (1, 2),
            Complexity::Moderate => (3, 5),
            Complexity::Complex => (6, 10),
            Complexity::HighlyComplex => (12, 22),
        }
    }

    /// Customer-facing package name.
    pub fn label(self) -> &'static str {
        match self {
            Complexity::Simple => "Basic",
            Complexity::Moderate => "Standard",
            Complexity::Complex => "Premium",
            Complexity::HighlyComplex => "Enterprise",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
            Complexity::HighlyComplex => "highly-complex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub complexity: Complexity,
    pub estimated_colors: u32,
    pub has_gradients: bool,
    pub has_details: bool,
    pub base_price: Decimal,
    pub turnaround_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzing,
    Complete { result: AnalysisResult },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: Decimal,
}

fn one_image() -> NonZeroU32 {
    NonZeroU32::MIN
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default = "one_image")]
    pub image_count: NonZeroU32,
    #[serde(default)]
    pub add_ons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub complexity: Complexity,
    pub image_count: u32,
    pub add_ons: Vec<String>,
    pub base_price: Decimal,
    pub add_on_total: Decimal,
    pub subtotal: Decimal,
    pub discount_percentage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<&'static str>,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub turnaround_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStep {
    Details,
    Payment,
    Confirmed,
}

impl OrderStep {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStep::Details => "details",
            OrderStep::Payment => "payment",
            OrderStep::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub step: OrderStep,
    pub quote: Quote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerDetails>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstructions {
    pub order_id: Uuid,
    pub amount: Decimal,
    pub currency: &'static str,
    pub payment_email: String,
    pub support_email: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub attempt_id: Uuid,
    pub file: FileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub analysis: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: &'static str,
    pub complexity: Complexity,
    pub description: &'static str,
    pub price: Decimal,
    pub turnaround_hours: u32,
    pub features: &'static [&'static str],
    pub popular: bool,
}
