use crate::dto::HealthRes;

/// Simple health service shared by every API surface.
///
/// Reports liveness together with the size of the currently published index, so a load
/// balancer check also tells an operator whether an upload has happened yet.
pub struct HealthService;

impl HealthService {
    /// Builds a health response for a service currently serving `distinct_locations` locations.
    pub fn check_health(distinct_locations: usize) -> HealthRes {
        HealthRes {
            ok: true,
            message: "placement locator is alive".into(),
            distinct_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_locations() {
        let res = HealthService::check_health(3);
        assert!(res.ok);
        assert_eq!(res.distinct_locations, 3);
    }
}
