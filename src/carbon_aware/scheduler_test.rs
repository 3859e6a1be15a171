//! Behavioural tests for region selection: monotonicity, urgency, ties

#[cfg(test)]
mod tests {
    use crate::carbon_aware::catalog::RegionCatalog;
    use crate::carbon_aware::scheduler::Scheduler;
    use crate::carbon_aware::types::{Job, Region, Urgency};

    const EPS: f64 = 1e-9;

    fn region(id: &str, carbon_intensity: f64, latency: f64) -> Region {
        Region {
            id: id.to_string(),
            name: id.to_string(),
            location: "Test".to_string(),
            carbon_intensity,
            cost: 0.1,
            latency,
            availability: 99.0,
        }
    }

    fn job(urgency: Urgency) -> Job {
        Job::new("render", 16, 4.0, urgency).unwrap()
    }

    #[test]
    fn test_selection_is_closed_over_catalog() {
        let scheduler = Scheduler::default();
        let catalog = RegionCatalog::builtin();
        for urgency in Urgency::ALL {
            for cpu in [1, 7, 64, 128] {
                for runtime in [0.1, 1.0, 12.5, 168.0] {
                    let job = Job::new("sweep", cpu, runtime, urgency).unwrap();
                    let result = scheduler.schedule(&job, catalog.regions()).unwrap();
                    assert!(catalog.regions().contains(&result.region));

                    let energy = f64::from(cpu) * runtime * 0.3;
                    assert!((result.estimated_energy - energy).abs() < EPS);
                    let ci = result.region.carbon_intensity;
                    assert!((result.estimated_co2 - energy * ci / 1000.0).abs() < EPS);
                    assert!(
                        (result.estimated_cost - result.region.cost * runtime * f64::from(cpu))
                            .abs()
                            < EPS
                    );
                    assert!((result.carbon_saved - energy * (475.0 - ci) / 1000.0).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn test_builtin_catalog_choice() {
        let scheduler = Scheduler::default();
        let catalog = RegionCatalog::builtin();
        for urgency in Urgency::ALL {
            let result = scheduler.schedule(&job(urgency), catalog.regions()).unwrap();
            assert_eq!(result.region.id, "canada-hydro");
        }
    }

    #[test]
    fn test_carbon_monotonicity() {
        let scheduler = Scheduler::default();
        let base = region("r", 200.0, 80.0);
        let mut cleaner = base.clone();
        cleaner.carbon_intensity -= 40.0;

        let delta =
            scheduler.score(&cleaner, Urgency::Medium) - scheduler.score(&base, Urgency::Medium);
        assert!((delta - 50.0 / 500.0 * 40.0).abs() < EPS);
    }

    #[test]
    fn test_cost_monotonicity() {
        let scheduler = Scheduler::default();
        let base = region("r", 200.0, 80.0);
        let mut cheaper = base.clone();
        cheaper.cost -= 0.03;

        let delta = scheduler.score(&cheaper, Urgency::Low) - scheduler.score(&base, Urgency::Low);
        assert!((delta - 20.0 / 0.2 * 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_latency_monotonicity_per_urgency() {
        let scheduler = Scheduler::default();
        let base = region("r", 200.0, 120.0);
        let mut faster = base.clone();
        faster.latency -= 60.0;

        let weights = [
            (Urgency::Low, 5.0),
            (Urgency::Medium, 15.0),
            (Urgency::High, 25.0),
        ];
        for (urgency, weight) in weights {
            let delta = scheduler.score(&faster, urgency) - scheduler.score(&base, urgency);
            assert!((delta - weight / 200.0 * 60.0).abs() < EPS, "{} delta {}", urgency, delta);
        }
    }

    #[test]
    fn test_urgency_shifts_selection_toward_latency() {
        let scheduler = Scheduler::default();
        let regions = vec![
            region("green-but-far", 50.0, 190.0),
            region("near-but-dirtier", 120.0, 10.0),
        ];

        let low = scheduler.schedule(&job(Urgency::Low), &regions).unwrap();
        let high = scheduler.schedule(&job(Urgency::High), &regions).unwrap();
        assert_eq!(low.region.id, "green-but-far");
        assert_eq!(high.region.id, "near-but-dirtier");
    }

    #[test]
    fn test_urgency_only_changes_latency_term() {
        let scheduler = Scheduler::default();
        let r = region("r", 90.0, 50.0);
        let low = scheduler.breakdown(&r, Urgency::Low);
        let high = scheduler.breakdown(&r, Urgency::High);
        assert_eq!(low.carbon, high.carbon);
        assert_eq!(low.cost, high.cost);
        assert_eq!(low.availability, high.availability);
        assert!(high.latency > low.latency);
    }

    #[test]
    fn test_ties_resolve_to_first_in_catalog_order() {
        let scheduler = Scheduler::default();
        let regions = vec![region("twin-a", 100.0, 60.0), region("twin-b", 100.0, 60.0)];
        for _ in 0..10 {
            let result = scheduler.schedule(&job(Urgency::Medium), &regions).unwrap();
            assert_eq!(result.region.id, "twin-a");
        }

        let reversed: Vec<Region> = regions.iter().rev().cloned().collect();
        let result = scheduler.schedule(&job(Urgency::Medium), &reversed).unwrap();
        assert_eq!(result.region.id, "twin-b");

        let ranking = scheduler.rank(Urgency::Medium, &regions).unwrap();
        assert_eq!(ranking[0].region_id, "twin-a");
    }

    #[test]
    fn test_rank_rejects_malformed_region_like_schedule() {
        let scheduler = Scheduler::default();
        let mut regions = vec![region("clean", 50.0, 60.0), region("broken", 100.0, 60.0)];
        regions[1].carbon_intensity = f64::NAN;

        let err = scheduler.rank(Urgency::Low, &regions).unwrap_err();
        assert!(err.is_validation());
        assert!(scheduler
            .schedule(&job(Urgency::Low), &regions)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_failed_call_leaves_catalog_untouched() {
        let scheduler = Scheduler::default();
        let catalog = RegionCatalog::builtin();
        let before = catalog.regions().to_vec();

        let mut bad = job(Urgency::High);
        bad.cpu_usage = 129;
        assert!(scheduler.schedule(&bad, catalog.regions()).is_err());
        assert_eq!(catalog.regions(), before.as_slice());
    }
}
