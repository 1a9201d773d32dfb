use metrics::counter;

/// Account counters. `outcome` is `ok` or the lowercase error kind.
pub struct UserMetrics;

impl UserMetrics {
    pub fn record_registration(outcome: &'static str) {
        counter!("user_registrations_total", "outcome" => outcome).increment(1);
    }

    pub fn record_login(outcome: &'static str) {
        counter!("user_logins_total", "outcome" => outcome).increment(1);
    }
}
