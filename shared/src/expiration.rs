//! Expiration status, grouping and reminder scheduling
//!
//! Everything in this module is pure: callers pass "today" (or "now")
//! explicitly so results are deterministic and testable.

use crate::models::{GroupedProducts, Product};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of days (inclusive) before expiration that counts as "soon"
pub const SOON_THRESHOLD_DAYS: i64 = 3;

/// Default reminder lead times in days before expiration
pub const DEFAULT_REMINDER_LEAD_DAYS: &[i64] = &[3, 1, 0];

/// Default hour of day (UTC) at which reminders fire
pub const DEFAULT_REMINDER_HOUR: u32 = 9;

/// Severity bucket of an expiration date relative to today
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Expired,
    Today,
    Soon,
    Fresh,
}

impl Severity {
    /// Display color for the severity
    pub fn color(self) -> &'static str {
        match self {
            Severity::Expired => "red",
            Severity::Today => "orange",
            Severity::Soon => "yellow",
            Severity::Fresh => "green",
        }
    }

    /// Icon identifier for the severity
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Expired => "xmark.octagon",
            Severity::Today => "exclamationmark.triangle",
            Severity::Soon => "clock",
            Severity::Fresh => "checkmark.circle",
        }
    }
}

/// Human-facing expiration status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpirationStatus {
    /// `expiration - today` in calendar days; negative once expired
    pub days_remaining: i64,
    pub severity: Severity,
    pub message: String,
    pub color: String,
    pub icon: String,
}

impl ExpirationStatus {
    pub fn is_expired(&self) -> bool {
        self.severity == Severity::Expired
    }
}

/// Whole calendar days from `today` until `expiration`
pub fn days_until(expiration: NaiveDate, today: NaiveDate) -> i64 {
    expiration.signed_duration_since(today).num_days()
}

fn pluralize_days(n: i64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// Classify an expiration date against today
pub fn classify(expiration: NaiveDate, today: NaiveDate) -> ExpirationStatus {
    let days = days_until(expiration, today);

    let (severity, message) = match days {
        d if d < 0 => {
            let n = d.abs();
            (Severity::Expired, format!("Expired {} {} ago", n, pluralize_days(n)))
        }
        0 => (Severity::Today, "Expires today".to_string()),
        d if d <= SOON_THRESHOLD_DAYS => (
            Severity::Soon,
            format!("Expires in {} {}", d, pluralize_days(d)),
        ),
        d => (Severity::Fresh, format!("Expires in {} {}", d, pluralize_days(d))),
    };

    ExpirationStatus {
        days_remaining: days,
        severity,
        message,
        color: severity.color().to_string(),
        icon: severity.icon().to_string(),
    }
}

/// Bucket products by expiration date, soonest first
///
/// Products within a group are ordered by title (case-insensitive), then id.
pub fn group_by_expiration(products: Vec<Product>, today: NaiveDate) -> Vec<GroupedProducts> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Product>> = BTreeMap::new();
    for product in products {
        buckets.entry(product.expiration_date).or_default().push(product);
    }

    buckets
        .into_iter()
        .map(|(date, mut items)| {
            items.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            });
            let user_id = items.first().map(|p| p.user_id).unwrap_or_default();
            GroupedProducts {
                date,
                user_id,
                status: classify(date, today),
                products: items,
            }
        })
        .collect()
}

/// A local notification the client should schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    pub product_id: uuid::Uuid,
    pub product_title: String,
    pub fire_at: DateTime<Utc>,
    pub days_before: i64,
    pub message: String,
}

/// Derive reminders for unused products
///
/// One reminder per product and lead time, at `hour:00` UTC on
/// `expiration - lead`. Reminders not strictly after `now` are dropped.
pub fn reminder_schedule(
    products: &[Product],
    now: DateTime<Utc>,
    lead_days: &[i64],
    hour: u32,
) -> Vec<Reminder> {
    let fire_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();

    let mut reminders: Vec<Reminder> = products
        .iter()
        .filter(|p| !p.used)
        .flat_map(|product| {
            lead_days.iter().filter_map(move |&lead| {
                let fire_date = product.expiration_date - Duration::days(lead);
                let fire_at = fire_date.and_time(fire_time).and_utc();
                if fire_at <= now {
                    return None;
                }
                let status = classify(product.expiration_date, fire_date);
                Some(Reminder {
                    product_id: product.id,
                    product_title: product.title.clone(),
                    fire_at,
                    days_before: lead,
                    message: format!("{}: {}", product.title, status.message),
                })
            })
        })
        .collect();

    reminders.sort_by(|a, b| {
        a.fire_at
            .cmp(&b.fire_at)
            .then_with(|| a.product_title.cmp(&b.product_title))
    });
    reminders
}
