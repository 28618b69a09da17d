use super::*;

#[test]
fn test_visit_set_reports_revisit() {
    let mut visits: VisitSet<u32> = VisitSet::with_profile(RecursionProfile::TypeRelation);
    assert_eq!(visits.enter(1), Visit::Fresh);
    assert!(visits.contains(&1));
    assert_eq!(visits.enter(1), Visit::Revisit);
    visits.leave(1);
    assert_eq!(visits.depth(), 0);
    assert!(!visits.is_exhausted());
}

#[test]
fn test_visit_set_depth_limit_is_sticky() {
    let mut visits: VisitSet<u32> = VisitSet::with_profile(RecursionProfile::Custom {
        max_depth: 2,
        max_steps: 100,
    });
    assert_eq!(visits.enter(1), Visit::Fresh);
    assert_eq!(visits.enter(2), Visit::Fresh);
    assert_eq!(visits.enter(3), Visit::Exhausted);
    assert!(!visits.contains(&3));
    visits.leave(2);
    visits.leave(1);
    assert!(visits.is_exhausted());
}

#[test]
fn test_visit_set_step_budget() {
    let mut visits: VisitSet<u32> = VisitSet::with_profile(RecursionProfile::Custom {
        max_depth: 10,
        max_steps: 2,
    });
    for key in [1, 2] {
        assert_eq!(visits.enter(key), Visit::Fresh);
        visits.leave(key);
    }
    assert_eq!(visits.enter(3), Visit::Exhausted);
}

#[test]
fn test_depth_counter() {
    let mut counter = DepthCounter::new(1);
    assert!(counter.enter());
    assert!(!counter.enter());
    assert_eq!(counter.depth(), 1);
    counter.leave();
    assert!(counter.is_exceeded());
}

#[test]
fn test_profile_limits() {
    assert_eq!(RecursionProfile::Substitution.max_depth(), MAX_TYPE_DEPTH);
    assert_eq!(RecursionProfile::GenericScan.max_depth(), MAX_TYPE_DEPTH);
    assert_eq!(RecursionProfile::TypeRelation.max_depth(), 100);
    assert_eq!(RecursionProfile::Formatting.max_depth(), 32);
    assert_eq!(RecursionProfile::TypeRelation.max_steps(), 100_000);
}
