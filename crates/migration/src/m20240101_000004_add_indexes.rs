use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Booking: composite (service_id, start_time) backing the overlap scan
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_service_start")
                    .table(Booking::Table)
                    .col(Booking::ServiceId)
                    .col(Booking::StartTime)
                    .to_owned(),
            )
            .await?;

        // Booking: index on user_id for per-user listings
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await?;

        // Service: index on is_active for catalog listings
        manager
            .create_index(
                Index::create()
                    .name("idx_service_active")
                    .table(Service::Table)
                    .col(Service::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_booking_service_start").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_user").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_active").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, UserId, ServiceId, StartTime }

#[derive(DeriveIden)]
enum Service { Table, IsActive }
