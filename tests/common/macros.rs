/// Asserts how many events of one wire name an `EventLog` holds.
#[macro_export]
macro_rules! assert_event_count {
    ($log:expr, $name:expr, $count:expr) => {
        assert_eq!(
            $log.count($name),
            $count,
            "expected {} `{}` events",
            $count,
            $name
        );
    };
}

/// Asserts that a handle no longer resolves to a live entity.
#[macro_export]
macro_rules! assert_gone {
    ($world:expr, $entity:expr) => {
        assert!(
            !$world.is_alive($entity),
            "entity {:?} should have been destroyed",
            $entity
        );
    };
}
