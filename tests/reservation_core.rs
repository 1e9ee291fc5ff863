//! Propiedades del core transaccional de inventario
//!
//! Estos tests necesitan PostgreSQL: se saltan solos cuando DATABASE_URL
//! no está definida. Cada test crea sus propias filas con datos únicos,
//! así pueden correr contra una BD compartida sin pisarse.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use bus_booking::controllers::booking_controller::BookingController;
use bus_booking::controllers::schedule_controller::ScheduleController;
use bus_booking::dto::booking_dto::CreateBookingRequest;
use bus_booking::dto::schedule_dto::UpdateScheduleRequest;
use bus_booking::models::booking::{BookingActor, BookingOutcome, CancelOutcome};
use bus_booking::models::user::UserRole;
use bus_booking::repositories::booking_repository::{BookingRepository, ReservationResult};
use bus_booking::repositories::bus_repository::BusRepository;
use bus_booking::repositories::route_repository::RouteRepository;
use bus_booking::repositories::schedule_repository::ScheduleRepository;
use bus_booking::utils::errors::AppError;

const SCHEMA: &str = include_str!("../src/database/schema.sql");

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&url)
        .await
        .expect("connect to test database");

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("apply schema");

    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

async fn create_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, full_name, password, role, created_at) \
         VALUES ($1, $2, 'secret', $3, $4)",
    )
    .bind(id)
    .bind(unique("customer"))
    .bind(UserRole::CUSTOMER)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("insert user");
    id
}

async fn create_bus(pool: &PgPool, total_seats: i32) -> Uuid {
    let bus = BusRepository::new(pool.clone())
        .create(unique("BUS"), total_seats, "VIP".to_string(), true)
        .await
        .expect("create bus");
    bus.id
}

async fn create_route(pool: &PgPool) -> Uuid {
    let route = RouteRepository::new(pool.clone())
        .create(unique("Ciudad"), unique("Ciudad"), 120.0, "3h".to_string())
        .await
        .expect("create route");
    route.id
}

async fn create_schedule(pool: &PgPool, bus_id: Uuid, route_id: Uuid, seats: i32) -> Uuid {
    let departure = Utc::now() + Duration::days(7);
    let schedule = ScheduleRepository::new(pool.clone())
        .create(
            bus_id,
            route_id,
            departure,
            departure + Duration::hours(4),
            Decimal::new(1500, 2),
            seats,
        )
        .await
        .expect("create schedule");
    schedule.id
}

async fn available_seats(pool: &PgPool, schedule_id: Uuid) -> i32 {
    let (seats,): (i32,) =
        sqlx::query_as("SELECT available_seats FROM schedules WHERE id = $1")
            .bind(schedule_id)
            .fetch_one(pool)
            .await
            .expect("read available_seats");
    seats
}

// ---------------------------------------------------------------------------
// No overbooking: M > N reservas concurrentes sobre N asientos producen
// exactamente N éxitos y M - N SoldOut; el contador termina en 0.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_no_overbooking_under_concurrency() {
    let Some(pool) = test_pool().await else { return };

    let seats = 3;
    let attempts = 8;
    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, seats).await;

    let mut handles = Vec::new();
    for seat in 1..=attempts {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            BookingRepository::new(pool)
                .create_confirmed(user_id, schedule_id, &seat.to_string(), Decimal::new(1500, 2))
                .await
        }));
    }

    let mut created = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.expect("task").expect("reservation") {
            ReservationResult::Created(booking) => {
                assert_eq!(booking.status, "CONFIRMED");
                created += 1;
            }
            ReservationResult::SoldOut => sold_out += 1,
        }
    }

    assert_eq!(created, seats);
    assert_eq!(sold_out, attempts - seats);
    assert_eq!(available_seats(&pool, schedule_id).await, 0);
}

// ---------------------------------------------------------------------------
// Escenario concreto: un asiento disponible, dos llamadas simultáneas por
// el mismo asiento. Exactamente una reserva CONFIRMED, la otra SoldOut.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_two_callers_one_seat() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 1).await;

    let spawn_attempt = |pool: PgPool| {
        tokio::spawn(async move {
            BookingRepository::new(pool)
                .create_confirmed(user_id, schedule_id, "5", Decimal::new(1500, 2))
                .await
        })
    };

    let a = spawn_attempt(pool.clone());
    let b = spawn_attempt(pool.clone());

    let results = [
        a.await.expect("task").expect("reservation"),
        b.await.expect("task").expect("reservation"),
    ];

    let created = results
        .iter()
        .filter(|r| matches!(r, ReservationResult::Created(_)))
        .count();
    let sold_out = results
        .iter()
        .filter(|r| matches!(r, ReservationResult::SoldOut))
        .count();

    assert_eq!(created, 1);
    assert_eq!(sold_out, 1);
    assert_eq!(available_seats(&pool, schedule_id).await, 0);
}

// ---------------------------------------------------------------------------
// Asiento único entre CONFIRMED: reservar dos veces el mismo asiento (con
// inventario de sobra) rechaza la segunda y revierte su decremento.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_duplicate_seat_rejected_and_rolled_back() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let repo = BookingRepository::new(pool.clone());

    let first = repo
        .create_confirmed(user_id, schedule_id, "7", Decimal::new(1500, 2))
        .await
        .expect("first reservation");
    assert!(matches!(first, ReservationResult::Created(_)));

    let second = repo
        .create_confirmed(user_id, schedule_id, "7", Decimal::new(1500, 2))
        .await;
    assert!(second.is_err(), "same seat twice must be rejected");

    // El decremento del intento fallido se revirtió
    assert_eq!(available_seats(&pool, schedule_id).await, 9);
}

// ---------------------------------------------------------------------------
// Cancelación idempotente: la segunda cancelación no devuelve el asiento
// otra vez.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_cancel_is_idempotent() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let repo = BookingRepository::new(pool.clone());
    let booking = match repo
        .create_confirmed(user_id, schedule_id, "3", Decimal::new(1500, 2))
        .await
        .expect("reservation")
    {
        ReservationResult::Created(b) => b,
        other => panic!("expected created booking, got {:?}", other),
    };
    assert_eq!(available_seats(&pool, schedule_id).await, 9);

    let first = repo.cancel(booking.id, Some(user_id)).await.expect("cancel");
    assert_eq!(first, CancelOutcome::Cancelled);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);

    let second = repo.cancel(booking.id, Some(user_id)).await.expect("cancel");
    assert_eq!(second, CancelOutcome::AlreadyCancelled);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);

    // Modo administrativo sobre la misma reserva: tampoco reembolsa
    let admin = repo.cancel(booking.id, None).await.expect("cancel");
    assert_eq!(admin, CancelOutcome::AlreadyCancelled);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);
}

// ---------------------------------------------------------------------------
// Dos cancelaciones concurrentes sobre la misma reserva: el row lock
// garantiza un solo reembolso.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_concurrent_cancels_refund_once() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let repo = BookingRepository::new(pool.clone());
    let booking = match repo
        .create_confirmed(user_id, schedule_id, "4", Decimal::new(1500, 2))
        .await
        .expect("reservation")
    {
        ReservationResult::Created(b) => b,
        other => panic!("expected created booking, got {:?}", other),
    };

    // Una self-service y una administrativa, a la vez
    let self_cancel = {
        let pool = pool.clone();
        tokio::spawn(async move {
            BookingRepository::new(pool).cancel(booking.id, Some(user_id)).await
        })
    };
    let admin_cancel = {
        let pool = pool.clone();
        tokio::spawn(
            async move { BookingRepository::new(pool).cancel(booking.id, None).await },
        )
    };

    let outcomes = [
        self_cancel.await.expect("task").expect("cancel"),
        admin_cancel.await.expect("task").expect("cancel"),
    ];

    let cancelled = outcomes
        .iter()
        .filter(|o| **o == CancelOutcome::Cancelled)
        .count();
    let already = outcomes
        .iter()
        .filter(|o| **o == CancelOutcome::AlreadyCancelled)
        .count();

    assert_eq!(cancelled, 1);
    assert_eq!(already, 1);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);
}

// ---------------------------------------------------------------------------
// Propiedad de la máquina de estados: purgar exige CANCELLED.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_purge_requires_cancelled_status() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let repo = BookingRepository::new(pool.clone());
    let booking = match repo
        .create_confirmed(user_id, schedule_id, "9", Decimal::new(1500, 2))
        .await
        .expect("reservation")
    {
        ReservationResult::Created(b) => b,
        other => panic!("expected created booking, got {:?}", other),
    };

    // CONFIRMED no se purga
    let removed = repo.purge_cancelled(booking.id, Some(user_id)).await.expect("purge");
    assert!(!removed);

    repo.cancel(booking.id, Some(user_id)).await.expect("cancel");

    // CANCELLED sí, sin tocar el inventario (el reembolso ya ocurrió)
    let removed = repo.purge_cancelled(booking.id, Some(user_id)).await.expect("purge");
    assert!(removed);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);

    assert!(repo.find_by_id(booking.id).await.expect("find").is_none());
}

// ---------------------------------------------------------------------------
// El cliente debe existir antes de tocar el inventario.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_booking_requires_existing_customer() {
    let Some(pool) = test_pool().await else { return };

    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let controller = BookingController::new(pool.clone());
    let result = controller
        .create(CreateBookingRequest {
            customer_id: Uuid::new_v4(),
            schedule_id,
            seat_number: "1".to_string(),
            total_amount: Decimal::new(1500, 2),
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(available_seats(&pool, schedule_id).await, 10);
}

// ---------------------------------------------------------------------------
// Reserva sobre un schedule que ya partió: rechazo tipado sin mutación.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_departed_schedule_rejected() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;

    // Salida en el pasado
    let departure = Utc::now() - Duration::hours(2);
    let schedule = ScheduleRepository::new(pool.clone())
        .create(
            bus_id,
            route_id,
            departure,
            departure + Duration::hours(4),
            Decimal::new(1500, 2),
            10,
        )
        .await
        .expect("create schedule");

    let controller = BookingController::new(pool.clone());
    let outcome = controller
        .create(CreateBookingRequest {
            customer_id: user_id,
            schedule_id: schedule.id,
            seat_number: "1".to_string(),
            total_amount: Decimal::new(1500, 2),
        })
        .await
        .expect("create");

    assert!(matches!(outcome, BookingOutcome::ScheduleDeparted));
    assert_eq!(available_seats(&pool, schedule.id).await, 10);
}

// ---------------------------------------------------------------------------
// Un update administrativo que no pide tocar el contador no lo escribe:
// sin esto, editar el precio en paralelo con una reserva restauraría el
// asiento recién vendido (lectura sin lock + escritura ciega).
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_schedule_edit_does_not_restore_sold_seats() {
    let Some(pool) = test_pool().await else { return };

    let user_id = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    // Una reserva decrementa el contador a 9
    let result = BookingRepository::new(pool.clone())
        .create_confirmed(user_id, schedule_id, "6", Decimal::new(1500, 2))
        .await
        .expect("reservation");
    assert!(matches!(result, ReservationResult::Created(_)));
    assert_eq!(available_seats(&pool, schedule_id).await, 9);

    // Editar solo el precio no devuelve el asiento vendido
    let controller = ScheduleController::new(pool.clone());
    controller
        .update(
            schedule_id,
            UpdateScheduleRequest {
                departure_time: None,
                arrival_time: None,
                ticket_price: Some(Decimal::new(1800, 2)),
                available_seats: None,
            },
        )
        .await
        .expect("update");
    assert_eq!(available_seats(&pool, schedule_id).await, 9);

    // El override explícito sí escribe el contador
    controller
        .update(
            schedule_id,
            UpdateScheduleRequest {
                departure_time: None,
                arrival_time: None,
                ticket_price: None,
                available_seats: Some(5),
            },
        )
        .await
        .expect("update");
    assert_eq!(available_seats(&pool, schedule_id).await, 5);

    // Y sigue acotado por la capacidad del bus
    let over_capacity = controller
        .update(
            schedule_id,
            UpdateScheduleRequest {
                departure_time: None,
                arrival_time: None,
                ticket_price: None,
                available_seats: Some(51),
            },
        )
        .await;
    assert!(over_capacity.is_err());
    assert_eq!(available_seats(&pool, schedule_id).await, 5);
}

// ---------------------------------------------------------------------------
// Self-service exige propiedad; el modo administrativo no.
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_cancel_ownership_modes() {
    let Some(pool) = test_pool().await else { return };

    let owner = create_user(&pool).await;
    let stranger = create_user(&pool).await;
    let bus_id = create_bus(&pool, 50).await;
    let route_id = create_route(&pool).await;
    let schedule_id = create_schedule(&pool, bus_id, route_id, 10).await;

    let controller = BookingController::new(pool.clone());
    let booking = match controller
        .create(CreateBookingRequest {
            customer_id: owner,
            schedule_id,
            seat_number: "2".to_string(),
            total_amount: Decimal::new(1500, 2),
        })
        .await
        .expect("create")
    {
        BookingOutcome::Confirmed(b) => b,
        other => panic!("expected confirmed booking, got {:?}", other),
    };

    // Otro usuario no ve la reserva en modo self-service
    let outcome = controller
        .cancel(booking.id, BookingActor::Customer(stranger))
        .await
        .expect("cancel");
    assert_eq!(outcome, CancelOutcome::NotFound);
    assert_eq!(available_seats(&pool, schedule_id).await, 9);

    // El modo administrativo cancela sin check de propiedad
    let outcome = controller
        .cancel(booking.id, BookingActor::Admin)
        .await
        .expect("cancel");
    assert_eq!(outcome, CancelOutcome::Cancelled);
    assert_eq!(available_seats(&pool, schedule_id).await, 10);
}
