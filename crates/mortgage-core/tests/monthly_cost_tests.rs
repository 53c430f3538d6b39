use mortgage_core::monthly_cost::{
    calculate_monthly_cost, minimum_down_payment, mortgage_insurance_premium, MonthlyCostInput,
};
use mortgage_core::payment::PaymentFrequency;
use mortgage_core::rates::Compounding;
use mortgage_core::MortgageError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

fn sample() -> MonthlyCostInput {
    serde_json::from_str(
        r#"{
            "home_price": "1000000",
            "down_payment": "75000",
            "annual_rate_percent": "6.29",
            "term_years": 5,
            "amortization_years": 25,
            "property_tax_annual": "10000",
            "heat_monthly": "200"
        }"#,
    )
    .unwrap()
}

#[test]
fn test_defaults_from_json() {
    let input = sample();
    assert_eq!(input.compounding, Compounding::SemiAnnual);
    assert_eq!(input.payment_frequency, PaymentFrequency::Monthly);
    assert!(!input.first_time_buyer);
}

#[test]
fn test_total_monthly_cost() {
    let out = calculate_monthly_cost(&sample()).unwrap();
    let r = &out.result;
    assert_eq!(r.minimum_down_payment, dec!(75_000));
    assert_eq!(r.insured_principal, dec!(962_000));
    assert_close(r.total_home_expenses, dec!(1033.33), dec!(0.01), "home expenses");
    assert_close(r.total_monthly_cost, dec!(7355.07), dec!(0.05), "total");
    assert_close(r.balance_at_term_end, dec!(867_717.30), dec!(0.5), "renewal balance");
}

#[test]
fn test_biweekly_monthly_equivalent() {
    let mut input = sample();
    input.payment_frequency = PaymentFrequency::BiWeekly;
    let out = calculate_monthly_cost(&input).unwrap();
    assert_eq!(out.result.payments_per_year, 26);
    assert_close(out.result.periodic_payment, dec!(2913.67), dec!(0.05), "bi-weekly");
    assert_close(
        out.result.monthly_equivalent_payment,
        dec!(6312.95),
        dec!(0.05),
        "monthly equivalent",
    );
}

#[test]
fn test_zero_rate_straight_line() {
    let mut input = sample();
    input.annual_rate_percent = Decimal::ZERO;
    input.down_payment = dec!(200_000);
    input.property_tax_annual = Decimal::ZERO;
    input.heat_monthly = Decimal::ZERO;
    let out = calculate_monthly_cost(&input).unwrap();
    // 800k over 300 months
    assert_close(out.result.periodic_payment, dec!(2666.67), dec!(0.01), "payment");
    assert_eq!(out.result.total_interest_over_term, Decimal::ZERO);
}

#[test]
fn test_premium_schedule() {
    assert_eq!(mortgage_insurance_premium(dec!(100_000), dec!(12)), dec!(3_100));
    assert_eq!(mortgage_insurance_premium(dec!(100_000), dec!(16)), dec!(2_800));
    assert_eq!(minimum_down_payment(dec!(2_000_000)), dec!(400_000));
}

#[test]
fn test_full_cash_purchase() {
    let mut input = sample();
    input.down_payment = input.home_price;
    let out = calculate_monthly_cost(&input).unwrap();
    assert_eq!(out.result.insured_principal, Decimal::ZERO);
    assert_eq!(out.result.periodic_payment, Decimal::ZERO);
}

#[test]
fn test_invalid_inputs() {
    let mut input = sample();
    input.down_payment = dec!(-1);
    assert!(matches!(
        calculate_monthly_cost(&input),
        Err(MortgageError::InvalidInput { .. })
    ));

    let mut input = sample();
    input.home_price = Decimal::ZERO;
    assert!(calculate_monthly_cost(&input).is_err());

    let mut input = sample();
    input.term_years = 0;
    assert!(calculate_monthly_cost(&input).is_err());
}

#[test]
fn test_negative_expense_rejected_not_clamped() {
    let mut input = sample();
    input.property_tax_annual = dec!(-60_000);
    match calculate_monthly_cost(&input) {
        Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, "property_tax_annual"),
        other => panic!("expected invalid input, got {other:?}"),
    }
}
