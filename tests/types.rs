// ABOUTME: Integration tests for validated domain types.
// ABOUTME: Tests image reference parsing, service name rules, and version lists.

use stable_galaxy::types::*;

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name() {
        let img = ImageRef::parse("nginx").unwrap();
        assert_eq!(img.repository(), "nginx");
        assert!(img.tag().is_none());
        assert!(img.digest().is_none());
        assert_eq!(img.version().unwrap().as_str(), DEFAULT_TAG);
    }

    #[test]
    fn parse_with_registry_and_tag() {
        let img = ImageRef::parse("registry.example.com/myapp:v1.2.3").unwrap();
        assert_eq!(img.repository(), "registry.example.com/myapp");
        assert_eq!(img.tag(), Some("v1.2.3"));
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let img = ImageRef::parse("localhost:5000/team/app").unwrap();
        assert_eq!(img.repository(), "localhost:5000/team/app");
        assert!(img.tag().is_none());
    }

    #[test]
    fn parse_with_digest() {
        let img = ImageRef::parse("nginx:1.25@sha256:abc123def456").unwrap();
        assert_eq!(img.tag(), Some("1.25"));
        assert_eq!(img.digest(), Some("sha256:abc123def456"));
        assert_eq!(img.to_string(), "nginx:1.25@sha256:abc123def456");
    }

    #[test]
    fn rejects_empty_and_invalid() {
        assert!(matches!(ImageRef::parse("  "), Err(ParseImageRefError::Empty)));
        assert!(matches!(
            ImageRef::parse("nginx latest"),
            Err(ParseImageRefError::InvalidChar(' '))
        ));
    }
}

mod service_name_tests {
    use super::*;

    #[test]
    fn accepts_dns_style_names() {
        for name in ["web", "api-v2", "payments.checkout", "a"] {
            assert!(ServiceName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_bad_names() {
        assert!(matches!(ServiceName::new(""), Err(ServiceNameError::Empty)));
        assert!(matches!(
            ServiceName::new("-web"),
            Err(ServiceNameError::BadBoundary)
        ));
        assert!(matches!(
            ServiceName::new("web-"),
            Err(ServiceNameError::BadBoundary)
        ));
        assert!(matches!(
            ServiceName::new("Web"),
            Err(ServiceNameError::NotLowercase)
        ));
        assert!(matches!(
            ServiceName::new("web_app"),
            Err(ServiceNameError::InvalidChar('_'))
        ));
        assert!(matches!(
            ServiceName::new(&"a".repeat(254)),
            Err(ServiceNameError::TooLong)
        ));
    }
}

mod version_tests {
    use super::*;

    #[test]
    fn list_skips_blank_entries() {
        let versions = parse_version_list("v1.0.0,, v1.1.0 ,").unwrap();
        let names: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(names, vec!["v1.0.0", "v1.1.0"]);
    }

    #[test]
    fn deserializes_from_yaml_string() {
        let version: Version = serde_yaml::from_str("\" v2.0.0 \"").unwrap();
        assert_eq!(version.as_str(), "v2.0.0");
    }
}
