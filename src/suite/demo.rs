//! Demo key seeding and value assertions.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::discovery::parse_dword;
use crate::error::Result;
use crate::harness::AssertionHarness;
use crate::registry::{RegistryExt, RegistryPort, RegistryView};

/// Default value written to the demo key.
pub const DEMO_DEFAULT: &str = "LE Demo Root";

/// Data of the `DemoString` value.
pub const DEMO_STRING: &str = "Hello from Login Enterprise";

/// Data of the `DemoDWORD` value.
pub const DEMO_DWORD: u32 = 1;

/// Create the demo key with its default, string and integer values.
pub fn seed_demo_key(registry: &dyn RegistryPort, key: &str) -> Result<()> {
    registry.add_key(key)?;
    registry.set_default(key, DEMO_DEFAULT)?;
    registry.set_string(key, "DemoString", DEMO_STRING)?;
    registry.set_dword(key, "DemoDWORD", DEMO_DWORD)?;
    tracing::debug!("Seeded {}", key);
    Ok(())
}

/// Stamp `LastRunUtc` with `now` in RFC 3339 form and return the stamp.
pub fn write_last_run(registry: &dyn RegistryPort, key: &str, now: DateTime<Utc>) -> Result<String> {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    registry.set_string(key, "LastRunUtc", &stamp)?;
    Ok(stamp)
}

/// Whether integer value `name` equals `expected`.
///
/// Data may be decimal or `0x` hexadecimal. A missing or unparseable value
/// is `false`.
pub fn value_equals_dword(
    registry: &dyn RegistryPort,
    key: &str,
    name: &str,
    expected: u32,
) -> Result<bool> {
    let data = registry.read_value(key, name, RegistryView::Native)?;
    Ok(data.as_deref().and_then(parse_dword) == Some(expected))
}

/// Whether string value `name` is exactly `expected`. Missing is `false`.
pub fn value_equals_string(
    registry: &dyn RegistryPort,
    key: &str,
    name: &str,
    expected: &str,
) -> Result<bool> {
    let data = registry.read_value(key, name, RegistryView::Native)?;
    Ok(data.as_deref() == Some(expected))
}

fn non_empty(text: Option<String>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

/// Seed the demo key and run the read/write checks against it.
pub fn run_demo_checks(
    harness: &mut AssertionHarness<'_>,
    registry: &dyn RegistryPort,
    key: &str,
) -> Result<()> {
    let view = RegistryView::Native;
    seed_demo_key(registry, key)?;

    harness.check("Demo: QueryKey", "Demo key should list values", || {
        Ok(!registry.query_key(key, view)?.trim().is_empty())
    })?;
    harness.check("Demo: QueryValue", "DemoString should be present", || {
        Ok(!registry.query_value(key, "DemoString", view)?.trim().is_empty())
    })?;
    harness.check("Demo: ValueOnly", "DemoString value text should parse", || {
        Ok(non_empty(registry.read_value(key, "DemoString", view)?))
    })?;
    harness.check("Demo: DefaultValue", "Default value should be present", || {
        Ok(non_empty(registry.read_default(key, view)?))
    })?;
    harness.check("Demo: KeyExists", "Key should exist", || {
        Ok(registry.key_presence(key, view)?.is_present())
    })?;
    harness.check("Demo: ValueExists", "DemoDWORD should exist", || {
        Ok(registry.value_presence(key, "DemoDWORD", view)?.is_present())
    })?;

    write_last_run(registry, key, Utc::now())?;
    harness.pass("Demo: LastRunUtc", &format!("{}\\LastRunUtc updated", key));

    harness.check("Demo: DemoDWORD==1", "DemoDWORD must equal 1", || {
        value_equals_dword(registry, key, "DemoDWORD", DEMO_DWORD)
    })?;
    harness.check(
        "Demo: DemoString==literal",
        "DemoString must match expected text",
        || value_equals_string(registry, key, "DemoString", DEMO_STRING),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::harness::{RecordingReporter, FAIL_TIMER_MS};
    use crate::registry::MockRegistry;
    use chrono::TimeZone;

    const KEY: &str = r"HKCU\Software\LoginVSI\Demo";

    #[test]
    fn seeds_default_string_and_dword() {
        let reg = MockRegistry::new();
        seed_demo_key(&reg, KEY).unwrap();

        assert_eq!(
            reg.read_default(KEY, RegistryView::Native).unwrap().as_deref(),
            Some(DEMO_DEFAULT)
        );
        assert_eq!(reg.value(KEY, "DemoString").as_deref(), Some(DEMO_STRING));
        assert_eq!(reg.value(KEY, "DemoDWORD").as_deref(), Some("0x1"));
    }

    #[test]
    fn dword_accepts_decimal_and_hex() {
        let reg = MockRegistry::new();
        reg.insert_string(KEY, "Dec", "26");
        reg.insert_string(KEY, "Hex", "0x1A");
        reg.insert_string(KEY, "Text", "twenty-six");

        assert!(value_equals_dword(&reg, KEY, "Dec", 26).unwrap());
        assert!(value_equals_dword(&reg, KEY, "Hex", 26).unwrap());
        assert!(!value_equals_dword(&reg, KEY, "Text", 26).unwrap());
        assert!(!value_equals_dword(&reg, KEY, "Missing", 26).unwrap());
    }

    #[test]
    fn string_comparison_is_exact() {
        let reg = MockRegistry::new();
        reg.insert_string(KEY, "DemoString", DEMO_STRING);

        assert!(value_equals_string(&reg, KEY, "DemoString", DEMO_STRING).unwrap());
        assert!(!value_equals_string(&reg, KEY, "DemoString", &DEMO_STRING.to_lowercase()).unwrap());
        assert!(!value_equals_string(&reg, KEY, "Missing", "").unwrap());
    }

    #[test]
    fn last_run_is_rfc3339_utc() {
        let reg = MockRegistry::new();
        let now = Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap();
        let stamp = write_last_run(&reg, KEY, now).unwrap();

        assert_eq!(stamp, "2024-11-05T09:30:00.000Z");
        assert_eq!(reg.value(KEY, "LastRunUtc"), Some(stamp));
    }

    #[test]
    fn all_demo_checks_pass_on_healthy_registry() {
        let reg = MockRegistry::new();
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        run_demo_checks(&mut harness, &reg, KEY).unwrap();
        assert_eq!(harness.failed(), 0);
        assert_eq!(harness.passed(), 9);

        insta::assert_snapshot!(reporter.event_titles().join("\n"), @r"
        PASS: Demo: QueryKey
        PASS: Demo: QueryValue
        PASS: Demo: ValueOnly
        PASS: Demo: DefaultValue
        PASS: Demo: KeyExists
        PASS: Demo: ValueExists
        PASS: Demo: LastRunUtc
        PASS: Demo: DemoDWORD==1
        PASS: Demo: DemoString==literal
        ");
        assert_eq!(reporter.timer_value("Demo__DemoDWORD__1"), Some(0));
    }

    /// Delegates to a mock but times out every `query_key`.
    struct ListingTimesOut(MockRegistry);

    impl RegistryPort for ListingTimesOut {
        fn query_key(&self, key: &str, _view: RegistryView) -> Result<String> {
            Err(ScoutError::RegistryTimeout {
                command: format!("reg query {}", key),
                timeout_secs: 10,
            })
        }
        fn query_value(&self, key: &str, name: &str, view: RegistryView) -> Result<String> {
            self.0.query_value(key, name, view)
        }
        fn query_default(&self, key: &str, view: RegistryView) -> Result<String> {
            self.0.query_default(key, view)
        }
        fn add_key(&self, key: &str) -> Result<()> {
            self.0.add_key(key)
        }
        fn set_default(&self, key: &str, data: &str) -> Result<()> {
            self.0.set_default(key, data)
        }
        fn set_string(&self, key: &str, name: &str, data: &str) -> Result<()> {
            self.0.set_string(key, name, data)
        }
        fn set_dword(&self, key: &str, name: &str, data: u32) -> Result<()> {
            self.0.set_dword(key, name, data)
        }
        fn delete_value(&self, key: &str, name: &str) -> Result<()> {
            self.0.delete_value(key, name)
        }
    }

    #[test]
    fn transport_error_inside_check_aborts() {
        let reg = ListingTimesOut(MockRegistry::new());
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        let err = run_demo_checks(&mut harness, &reg, KEY).unwrap_err();

        assert!(matches!(err, ScoutError::AssertionErrored { ref check, .. } if check == "Demo: QueryKey"));
        assert_eq!(reporter.event_titles(), vec!["ERROR: Demo: QueryKey"]);
        assert_eq!(reporter.timer_value("Demo__QueryKey"), Some(FAIL_TIMER_MS));
    }

    #[test]
    fn seeding_failure_propagates_before_any_check() {
        let reg = MockRegistry::new();
        reg.fail_with_timeout(KEY);
        let mut reporter = RecordingReporter::new();
        let mut harness = AssertionHarness::new(&mut reporter);

        let err = run_demo_checks(&mut harness, &reg, KEY).unwrap_err();

        assert!(matches!(err, ScoutError::RegistryTimeout { .. }));
        assert!(reporter.event_titles().is_empty());
    }
}
