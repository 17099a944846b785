use super::account::CardCredentials;
use chrono::{Datelike, Utc};
use rand::Rng;
use uuid::Uuid;

/// Card credentials stay valid for this many years after issue.
const CARD_VALIDITY_YEARS: u16 = 4;

/// Source of fresh identifiers for accounts and payments.
pub trait IdGenerator: Send + Sync {
    fn card(&self) -> CardCredentials;
    fn payment_id(&self) -> String;
}

/// Issues random Luhn-valid card numbers and UUID v4 payment ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn card(&self) -> CardCredentials {
        let mut rng = rand::thread_rng();

        let mut digits: Vec<u32> = Vec::with_capacity(16);
        digits.push(4);
        digits.extend((0..14).map(|_| rng.gen_range(0..10)));
        digits.push(luhn_check_digit(&digits));

        CardCredentials {
            card_number: digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect(),
            security_code: format!("{:03}", rng.gen_range(0..1000)),
            expiry_month: rng.gen_range(1..=12),
            expiry_year: Utc::now().year() as u16 + CARD_VALIDITY_YEARS,
        }
    }

    fn payment_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Check digit that makes `payload` followed by it pass the Luhn test.
fn luhn_check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}
