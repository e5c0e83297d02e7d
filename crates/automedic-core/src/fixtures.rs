//! Canned diagnoses served by the mock resolvers.

use crate::domain::DiagnosisResult;

pub fn worn_brake_pads() -> DiagnosisResult {
    DiagnosisResult {
        issue_title: "Worn Brake Pads".to_string(),
        severity_score: 8,
        confidence_level: 0.95,
        description: "The squeaking noise during braking combined with the mileage suggests the brake pads have worn down to the wear indicator.".to_string(),
        recommended_action: "Inspect brake pads immediately. If thickness is less than 3mm, replace pads.".to_string(),
        diy_possible: true,
        estimated_cost_range_usd: "$150 - $300".to_string(),
    }
}

pub fn dead_battery() -> DiagnosisResult {
    DiagnosisResult {
        issue_title: "Dead Battery".to_string(),
        severity_score: 6,
        confidence_level: 0.92,
        description: "The clicking sound on startup is a classic sign of insufficient voltage to the starter motor, likely due to an old battery.".to_string(),
        recommended_action: "Jump start the vehicle and test battery voltage. Replace battery if it holds less than 12.4V.".to_string(),
        diy_possible: true,
        estimated_cost_range_usd: "$100 - $200".to_string(),
    }
}

pub fn unbalanced_tires() -> DiagnosisResult {
    DiagnosisResult {
        issue_title: "Unbalanced Tires".to_string(),
        severity_score: 4,
        confidence_level: 0.88,
        description: "Vibration at high speeds typically indicates that the wheel weights have fallen off or tires are unevenly worn.".to_string(),
        recommended_action: "Take the car to a tire shop for balancing and rotation.".to_string(),
        diy_possible: false,
        estimated_cost_range_usd: "$50 - $100".to_string(),
    }
}

/// Fallback when no keyword rule matches.
pub fn engine_misfire() -> DiagnosisResult {
    DiagnosisResult {
        issue_title: "Engine Misfire".to_string(),
        severity_score: 7,
        confidence_level: 0.85,
        description: "Rough idling and check engine light often point to a misfire caused by worn spark plugs or a bad ignition coil.".to_string(),
        recommended_action: "Scan OBD2 codes. Inspect and replace spark plugs if fouled.".to_string(),
        diy_possible: true,
        estimated_cost_range_usd: "$200 - $400".to_string(),
    }
}
