use super::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn fires_once_after_delay() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(120));
    assert!(!d.fire_if_due(t0 + ms(500)));

    d.arm(t0);
    assert!(d.is_armed());
    assert!(!d.fire_if_due(t0 + ms(119)));
    assert!(d.fire_if_due(t0 + ms(120)));
    assert!(!d.fire_if_due(t0 + ms(121)));
    assert!(!d.is_armed());
}

#[test]
fn rearm_pushes_deadline_back() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(100));
    d.arm(t0);
    d.arm(t0 + ms(80));
    assert_eq!(d.deadline(), Some(t0 + ms(180)));
    assert!(!d.fire_if_due(t0 + ms(150)));
    assert!(d.fire_if_due(t0 + ms(180)));
}

#[test]
fn cancel_disarms() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(100));
    d.arm(t0);
    d.cancel();
    assert!(!d.fire_if_due(t0 + ms(1000)));
}
