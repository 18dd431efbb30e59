use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

use driver_scheduling::services::sample_data;
use driver_scheduling::{
    CreateDriverRequest, CreateRouteRequest, DriverId, DriverStatusFilter, EntityStore, Priority,
    RouteId, RouteStatus, SchedulingError, SchedulingService, StoreEvent, UpdateDriverRequest,
    UpdateRouteRequest, VehicleType,
};

fn seeded_service() -> SchedulingService {
    let store = EntityStore::seeded(sample_data::drivers(), sample_data::routes())
        .expect("sample data is consistent");
    SchedulingService::new(store)
}

fn driver_request(name: &str, vehicle_type: VehicleType) -> CreateDriverRequest {
    CreateDriverRequest {
        name: name.to_string(),
        email: format!("{}@fleet.example", name.to_lowercase().replace(' ', ".")),
        phone: "+1 555 0142".to_string(),
        license_number: "DL-100200".to_string(),
        experience: 5,
        vehicle_type,
    }
}

fn route_request(name: &str, vehicle_type: VehicleType) -> CreateRouteRequest {
    CreateRouteRequest {
        name: name.to_string(),
        start_location: "West Depot".to_string(),
        end_location: "Riverside Mall".to_string(),
        distance: 12.0,
        estimated_duration: 40,
        priority: Priority::Low,
        scheduled_date: Utc.with_ymd_and_hms(2025, 2, 3, 8, 0, 0).unwrap(),
        vehicle_type,
        description: None,
    }
}

/// Registrar los eventos publicados en orden
fn record_events(service: &mut SchedulingService) -> Arc<Mutex<Vec<StoreEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    service.subscribe(move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    events
}

fn take_kinds(events: &Arc<Mutex<Vec<StoreEvent>>>) -> Vec<&'static str> {
    events
        .lock()
        .unwrap()
        .drain(..)
        .map(|event| match event {
            StoreEvent::Drivers(_) => "drivers",
            StoreEvent::Routes(_) => "routes",
        })
        .collect()
}

fn assert_consistent(service: &SchedulingService) {
    let violations = service.store().consistency_violations();
    assert!(violations.is_empty(), "invariants broken: {:?}", violations);
}

#[test]
fn test_seed_scenario() {
    let mut service = seeded_service();
    let route1 = RouteId::from("route1");
    let route2 = RouteId::from("route2");

    // Conductor 1 no conduce camión; conductor 3 está ocupado y ya tiene la ruta
    assert!(service.candidate_drivers(&route1).unwrap().is_empty());

    // assign no verifica el tipo de vehículo: sedán en una ruta de furgoneta
    let assignment = service.assign(&DriverId::from("1"), &route2).unwrap();
    assert_ne!(assignment.driver.vehicle_type, assignment.route.vehicle_type);
    assert_eq!(assignment.route.status, RouteStatus::Assigned);

    let released = service.unassign(&DriverId::from("3"), &route1).unwrap();
    assert!(released.driver.is_available);
    assert!(released.driver.assigned_routes.is_empty());
    assert_eq!(released.route.status, RouteStatus::Unassigned);
    assert_eq!(released.route.assigned_driver_id, None);
    assert_eq!(released.route.assigned_driver_name, None);

    assert_consistent(&service);
}

#[test]
fn test_assign_then_unassign_restores_state() {
    let mut service = seeded_service();
    let driver = service.create_driver(driver_request("Omar Haddad", VehicleType::Van)).unwrap();
    let route_id = RouteId::from("route2");

    let drivers_before = service.store().drivers_snapshot();
    let routes_before = service.store().routes_snapshot();

    service.assign(&driver.id, &route_id).unwrap();
    service.unassign(&driver.id, &route_id).unwrap();

    assert_eq!(service.store().drivers_snapshot(), drivers_before);
    assert_eq!(service.store().routes_snapshot(), routes_before);
}

#[test]
fn test_assign_on_assigned_route_fails_without_changes() {
    let mut service = seeded_service();
    let drivers_before = service.store().drivers_snapshot();
    let routes_before = service.store().routes_snapshot();

    let err = service
        .assign(&DriverId::from("1"), &RouteId::from("route1"))
        .unwrap_err();

    assert!(matches!(err, SchedulingError::PreconditionFailed(_)));
    assert_eq!(err.code(), "PRECONDITION_FAILED");
    assert_eq!(service.store().drivers_snapshot(), drivers_before);
    assert_eq!(service.store().routes_snapshot(), routes_before);
}

#[test]
fn test_create_applies_defaults_and_unique_ids() {
    let mut service = seeded_service();
    let a = service.create_driver(driver_request("Ana Lopez", VehicleType::Suv)).unwrap();
    let b = service.create_driver(driver_request("Ben Carter", VehicleType::Suv)).unwrap();

    assert_ne!(a.id, b.id);
    assert!(a.is_available);
    assert_eq!(a.rating, 5.0);
    assert!(a.assigned_routes.is_empty());

    let route = service.create_route(route_request("Mall Drop", VehicleType::Suv)).unwrap();
    assert_eq!(route.status, RouteStatus::Unassigned);
    assert!(route.assigned_driver_id.is_none());

    // Borrar dos veces el mismo id: solo la primera encuentra el registro
    assert!(service.delete_driver(&a.id));
    assert!(service.get_driver(&a.id).is_none());
    assert!(!service.delete_driver(&a.id));
    assert!(service.store().drivers().iter().all(|d| d.id != a.id));
}

#[test]
fn test_invalid_requests_never_reach_the_store() {
    let mut service = seeded_service();
    let drivers_before = service.store().drivers_snapshot();
    let routes_before = service.store().routes_snapshot();

    let mut bad_driver = driver_request("X", VehicleType::Van);
    bad_driver.experience = 70;
    bad_driver.phone = "not a phone".to_string();
    match service.create_driver(bad_driver) {
        Err(SchedulingError::Validation(errors)) => {
            let fields = errors.field_errors();
            assert!(fields.contains_key("name"));
            assert!(fields.contains_key("experience"));
            assert!(fields.contains_key("phone"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let mut bad_route = route_request("Short Hop", VehicleType::Van);
    bad_route.distance = 0.0;
    bad_route.estimated_duration = 600;
    assert!(matches!(
        service.create_route(bad_route),
        Err(SchedulingError::Validation(_))
    ));

    let mut nan_route = route_request("Broken Meter", VehicleType::Van);
    nan_route.distance = f64::NAN;
    assert!(matches!(
        service.create_route(nan_route),
        Err(SchedulingError::Validation(_))
    ));

    assert_eq!(service.store().drivers_snapshot(), drivers_before);
    assert_eq!(service.store().routes_snapshot(), routes_before);
}

#[test]
fn test_update_missing_ids_report_not_found() {
    let mut service = seeded_service();
    let request = UpdateRouteRequest {
        name: Some("Renamed Route".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update_route(&RouteId::from("ghost"), &request),
        Err(SchedulingError::NotFound(_))
    ));
    assert!(service.get_route(&RouteId::from("ghost")).is_none());
    assert!(!service.delete_route(&RouteId::from("ghost")));
}

#[test]
fn test_route_status_updates_respect_assignment_link() {
    let mut service = seeded_service();

    let to_unassigned = UpdateRouteRequest {
        status: Some(RouteStatus::Unassigned),
        ..Default::default()
    };
    assert!(matches!(
        service.update_route(&RouteId::from("route1"), &to_unassigned),
        Err(SchedulingError::PreconditionFailed(_))
    ));

    let to_in_progress = UpdateRouteRequest {
        status: Some(RouteStatus::InProgress),
        ..Default::default()
    };
    assert!(matches!(
        service.update_route(&RouteId::from("route2"), &to_in_progress),
        Err(SchedulingError::PreconditionFailed(_))
    ));

    let started = service
        .update_route(&RouteId::from("route1"), &to_in_progress)
        .unwrap();
    assert_eq!(started.status, RouteStatus::InProgress);
    assert!(!service.get_driver(&DriverId::from("3")).unwrap().is_available);

    assert_consistent(&service);
}

#[test]
fn test_delete_cascades_keep_invariants() {
    let mut service = seeded_service();

    assert!(service.delete_driver(&DriverId::from("3")));
    let route1 = service.get_route(&RouteId::from("route1")).unwrap();
    assert_eq!(route1.status, RouteStatus::Unassigned);
    assert!(route1.assigned_driver_id.is_none());
    assert_consistent(&service);

    let mut service = seeded_service();
    assert!(service.delete_route(&RouteId::from("route1")));
    let driver3 = service.get_driver(&DriverId::from("3")).unwrap();
    assert!(driver3.is_available);
    assert!(driver3.assigned_routes.is_empty());
    assert_consistent(&service);
}

#[test]
fn test_every_mutation_publishes_full_snapshots() {
    let mut service = seeded_service();
    let events = Arc::new(Mutex::new(Vec::new()));

    let sink = events.clone();
    let subscription = service.subscribe(move |event| {
        sink.lock().unwrap().push(event.clone());
    });

    service.assign(&DriverId::from("1"), &RouteId::from("route2")).unwrap();

    {
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (StoreEvent::Drivers(drivers), StoreEvent::Routes(routes)) => {
                assert_eq!(drivers.as_slice(), service.store().drivers());
                assert_eq!(routes.as_slice(), service.store().routes());
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    // Una operación rechazada no notifica
    let _ = service.assign(&DriverId::from("1"), &RouteId::from("route2"));
    assert_eq!(events.lock().unwrap().len(), 2);

    assert!(service.unsubscribe(subscription));
    service.unassign_route(&RouteId::from("route2")).unwrap();
    assert_eq!(events.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_channel_subscriber_can_react_after_the_call() {
    let mut service = seeded_service();
    let (_, mut rx) = service.subscribe_channel();

    service.create_route(route_request("Evening Loop", VehicleType::Sedan)).unwrap();
    let event = rx.recv().await.expect("event queued");
    let new_route = match event {
        StoreEvent::Routes(routes) => routes.last().cloned().expect("route present"),
        other => panic!("unexpected event: {:?}", other),
    };

    // Reaccionar con otra mutación una vez que la primera retornó
    service.assign(&DriverId::from("1"), &new_route.id).unwrap();
    assert!(matches!(rx.recv().await, Some(StoreEvent::Drivers(_))));
    assert!(matches!(rx.recv().await, Some(StoreEvent::Routes(_))));
}

#[test]
fn test_filter_results_are_ordered_subsets() {
    let mut service = seeded_service();
    for name in ["Zoe Park", "Adam Reed", "Mia Chen"] {
        service.create_driver(driver_request(name, VehicleType::Van)).unwrap();
    }
    let all = service.store().drivers_snapshot();

    assert_eq!(service.filter_drivers("", DriverStatusFilter::All), all);

    for query in ["a", "E", "park", "555", "nobody"] {
        for status in [DriverStatusFilter::All, DriverStatusFilter::Available, DriverStatusFilter::Busy] {
            let filtered = service.filter_drivers(query, status);
            assert!(filtered.len() <= all.len());
            let positions: Vec<usize> = filtered
                .iter()
                .map(|d| all.iter().position(|x| x.id == d.id).expect("subset"))
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_random_operation_sequences_preserve_invariants() {
    let vehicle_types = [VehicleType::Sedan, VehicleType::Suv, VehicleType::Van, VehicleType::Truck];

    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut service = seeded_service();

        for step in 0..200 {
            let drivers = service.store().drivers_snapshot();
            let routes = service.store().routes_snapshot();

            match rng.gen_range(0..7) {
                0 => {
                    let vehicle = vehicle_types[rng.gen_range(0..vehicle_types.len())];
                    service
                        .create_driver(driver_request(&format!("Driver {}", step), vehicle))
                        .unwrap();
                }
                1 => {
                    let vehicle = vehicle_types[rng.gen_range(0..vehicle_types.len())];
                    service
                        .create_route(route_request(&format!("Route {}", step), vehicle))
                        .unwrap();
                }
                2 | 3 if !drivers.is_empty() && !routes.is_empty() => {
                    let driver = &drivers[rng.gen_range(0..drivers.len())];
                    let route = &routes[rng.gen_range(0..routes.len())];
                    let expected_ok = driver.is_available && route.status == RouteStatus::Unassigned;
                    assert_eq!(service.assign(&driver.id, &route.id).is_ok(), expected_ok);
                }
                4 if !drivers.is_empty() && !routes.is_empty() => {
                    let driver = &drivers[rng.gen_range(0..drivers.len())];
                    let route = &routes[rng.gen_range(0..routes.len())];
                    let expected_ok = route.assigned_driver_id.as_ref() == Some(&driver.id);
                    assert_eq!(service.unassign(&driver.id, &route.id).is_ok(), expected_ok);
                }
                5 if !drivers.is_empty() => {
                    let driver = &drivers[rng.gen_range(0..drivers.len())];
                    assert!(service.delete_driver(&driver.id));
                }
                6 if !routes.is_empty() => {
                    let route = &routes[rng.gen_range(0..routes.len())];
                    assert!(service.delete_route(&route.id));
                }
                _ => {}
            }

            assert_consistent(&service);
        }
    }
}

#[test]
fn test_updates_and_plain_deletes_publish_their_collection() {
    let mut service = seeded_service();
    let events = record_events(&mut service);

    let rename = UpdateDriverRequest {
        name: Some("Priya Nair-Lopez".to_string()),
        ..Default::default()
    };
    service.update_driver(&DriverId::from("3"), &rename).unwrap();
    assert_eq!(take_kinds(&events), vec!["drivers"]);

    let reschedule = UpdateRouteRequest {
        priority: Some(Priority::High),
        ..Default::default()
    };
    service.update_route(&RouteId::from("route2"), &reschedule).unwrap();
    assert_eq!(take_kinds(&events), vec!["routes"]);

    // Sin vínculos: solo se republica la colección afectada
    assert!(service.delete_route(&RouteId::from("route2")));
    assert_eq!(take_kinds(&events), vec!["routes"]);

    assert!(service.delete_driver(&DriverId::from("1")));
    assert_eq!(take_kinds(&events), vec!["drivers"]);

    // Borrar algo inexistente no notifica
    assert!(!service.delete_driver(&DriverId::from("1")));
    assert!(!service.delete_route(&RouteId::from("route2")));
    assert!(take_kinds(&events).is_empty());
}

#[test]
fn test_delete_cascades_publish_both_collections() {
    let mut service = seeded_service();
    let events = record_events(&mut service);

    assert!(service.delete_route(&RouteId::from("route1")));
    {
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (StoreEvent::Routes(routes), StoreEvent::Drivers(drivers)) => {
                assert!(routes.iter().all(|route| route.id.as_str() != "route1"));
                let driver3 = drivers.iter().find(|d| d.id.as_str() == "3").unwrap();
                assert!(driver3.is_available);
                assert!(driver3.assigned_routes.is_empty());
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    let mut service = seeded_service();
    let events = record_events(&mut service);

    assert!(service.delete_driver(&DriverId::from("3")));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    match (&events[0], &events[1]) {
        (StoreEvent::Drivers(drivers), StoreEvent::Routes(routes)) => {
            assert!(drivers.iter().all(|driver| driver.id.as_str() != "3"));
            let route1 = routes.iter().find(|r| r.id.as_str() == "route1").unwrap();
            assert_eq!(route1.status, RouteStatus::Unassigned);
            assert_eq!(route1.assigned_driver_id, None);
            assert_eq!(route1.assigned_driver_name, None);
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn test_rejected_driver_updates_do_not_publish() {
    let mut service = seeded_service();
    let events = record_events(&mut service);
    let before = service.store().drivers_snapshot();

    for rating in [6.0, 0.5] {
        let request = UpdateDriverRequest {
            rating: Some(rating),
            ..Default::default()
        };
        let result = service.update_driver(&DriverId::from("3"), &request);
        assert!(matches!(result, Err(SchedulingError::Validation(_))), "rating {}", rating);
    }

    let request = UpdateDriverRequest {
        rating: Some(4.2),
        ..Default::default()
    };
    let result = service.update_driver(&DriverId::from("ghost"), &request);
    assert!(matches!(result, Err(SchedulingError::NotFound(_))));
    assert_eq!(result.unwrap_err().code(), "NOT_FOUND");

    assert!(take_kinds(&events).is_empty());
    assert_eq!(service.store().drivers_snapshot(), before);

    let updated = service.update_driver(&DriverId::from("3"), &request).unwrap();
    assert_eq!(updated.rating, 4.2);
    assert_eq!(take_kinds(&events), vec!["drivers"]);
}

#[tokio::test]
async fn test_unsubscribed_channel_drains_then_closes() {
    let mut service = seeded_service();
    let (subscription, mut rx) = service.subscribe_channel();

    service.assign(&DriverId::from("1"), &RouteId::from("route2")).unwrap();
    assert!(service.unsubscribe(subscription));

    assert!(matches!(rx.recv().await, Some(StoreEvent::Drivers(_))));
    assert!(matches!(rx.recv().await, Some(StoreEvent::Routes(_))));
    assert!(rx.recv().await.is_none());
}

#[test]
fn test_route_description_can_be_cleared() {
    let mut service = seeded_service();
    let route1 = RouteId::from("route1");

    let untouched: UpdateRouteRequest = serde_json::from_str(r#"{"name": "Harbor Night Run"}"#).unwrap();
    let route = service.update_route(&route1, &untouched).unwrap();
    assert_eq!(route.description.as_deref(), Some("Container pickup, dock 7"));

    let cleared: UpdateRouteRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
    assert_eq!(cleared.description, Some(None));
    let route = service.update_route(&route1, &cleared).unwrap();
    assert_eq!(route.description, None);

    let replaced = UpdateRouteRequest {
        description: Some(Some("Gate 3 after 18:00".to_string())),
        ..Default::default()
    };
    let route = service.update_route(&route1, &replaced).unwrap();
    assert_eq!(route.description.as_deref(), Some("Gate 3 after 18:00"));

    let too_long = UpdateRouteRequest {
        description: Some(Some("x".repeat(1001))),
        ..Default::default()
    };
    assert!(matches!(
        service.update_route(&route1, &too_long),
        Err(SchedulingError::Validation(_))
    ));
}
