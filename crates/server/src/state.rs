use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::booking::{BookingService, SeaOrmBookingStore};
use service::catalog::SeaOrmServiceCatalog;
use service::identity::SeaOrmUserDirectory;

/// Production booking engine wired to the SeaORM store.
pub type Bookings = BookingService<SeaOrmBookingStore, SeaOrmServiceCatalog, SeaOrmUserDirectory>;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub bookings: Arc<Bookings>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let bookings = Arc::new(BookingService::new(
            Arc::new(SeaOrmBookingStore { db: db.clone() }),
            Arc::new(SeaOrmServiceCatalog { db: db.clone() }),
            Arc::new(SeaOrmUserDirectory { db: db.clone() }),
        ));
        Self { db, bookings }
    }
}
