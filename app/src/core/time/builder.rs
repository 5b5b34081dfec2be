#[macro_export]
macro_rules! t {
    (now) => {{
        $crate::core::time::DateTime::now()
    }};

    ($amount:literal seconds) => {{
        $crate::core::time::Duration::seconds($amount)
    }};
    ($amount:literal minutes) => {{
        $crate::core::time::Duration::minutes($amount)
    }};
    ($amount:literal hours) => {{
        $crate::core::time::Duration::hours($amount)
    }};

    ($amount:literal seconds ago) => {{
        t!(now) - t!($amount seconds)
    }};
    ($amount:literal minutes ago) => {{
        t!(now) - t!($amount minutes)
    }};
    ($amount:literal hours ago) => {{
        t!(now) - t!($amount hours)
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::time::*;

    #[test]
    fn test_now() {
        let now = t!(now);
        assert!(DateTime::now().elapsed_since(now) < Duration::seconds(1));
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(t!(10 minutes).as_minutes(), 10);
    }

    #[test]
    fn test_duration_hours() {
        assert_eq!(t!(3 hours).as_hours(), 3);
    }

    #[test]
    fn test_duration_hours_ago() {
        let now = DateTime::now();
        let dt = t!(3 hours ago);

        assert!(now >= dt);
        assert!(now - Duration::hours(3) <= dt);
    }

    #[tokio::test]
    async fn test_now_is_fixed_in_scope() {
        let fixed = DateTime::from_iso("2025-03-10T12:00:00Z").unwrap();

        let now = FIXED_NOW.scope(fixed, async { t!(now) }).await;

        assert_eq!(now, fixed);
    }
}
