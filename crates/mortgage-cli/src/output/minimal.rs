use serde_json::Value;

use super::display_scalar;

/// Headline figure of each calculator, in priority order.
const PRIORITY_KEYS: [&str; 7] = [
    "total_monthly_cost",
    "net_tax",
    "required_annual_income",
    "max_principal",
    "periodic_payment",
    "monthly_payment",
    "qualifying_rate_percent",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value, headline: Option<&str>) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in headline.into_iter().chain(PRIORITY_KEYS) {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", display_scalar(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, display_scalar(key, val));
            return;
        }
    }

    println!("{}", display_scalar("", result_obj));
}
