use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_recipe_tables::Migration),
            Box::new(m20240101_000002_create_inventory_tables::Migration),
            Box::new(m20240101_000003_create_tray_tables::Migration),
            Box::new(m20240101_000004_create_schedule_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_recipe_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_recipe_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Recipes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Recipes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Recipes::FarmId).uuid().null())
                        .col(ColumnDef::new(Recipes::SourceRecipeId).uuid().null())
                        .col(ColumnDef::new(Recipes::Name).string().not_null())
                        .col(ColumnDef::new(Recipes::VarietyId).uuid().null())
                        .col(
                            ColumnDef::new(Recipes::RequiresSoak)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Recipes::SoakHours).integer().null())
                        .col(
                            ColumnDef::new(Recipes::LeadTimeDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Recipes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Recipes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_recipes_farm")
                        .table(Recipes::Table)
                        .col(Recipes::FarmId)
                        .to_owned(),
                )
                .await?;

            // One farm copy per template
            manager
                .create_index(
                    Index::create()
                        .name("uq_recipes_farm_source")
                        .table(Recipes::Table)
                        .col(Recipes::FarmId)
                        .col(Recipes::SourceRecipeId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RecipeSteps::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RecipeSteps::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RecipeSteps::RecipeId).uuid().not_null())
                        .col(ColumnDef::new(RecipeSteps::Sequence).integer().not_null())
                        .col(ColumnDef::new(RecipeSteps::Description).string().not_null())
                        .col(
                            ColumnDef::new(RecipeSteps::DurationValue)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RecipeSteps::DurationUnit)
                                .string_len(8)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // No two steps share a sequence position within one recipe
            manager
                .create_index(
                    Index::create()
                        .name("uq_recipe_steps_sequence")
                        .table(RecipeSteps::Table)
                        .col(RecipeSteps::RecipeId)
                        .col(RecipeSteps::Sequence)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Varieties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Varieties::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Varieties::Name).string().not_null())
                        .col(ColumnDef::new(Varieties::SeedPerTray).decimal().null())
                        .col(ColumnDef::new(Varieties::SeedUnit).string_len(8).not_null())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RecipeSteps::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Varieties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Recipes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Recipes {
        Table,
        Id,
        FarmId,
        SourceRecipeId,
        Name,
        VarietyId,
        RequiresSoak,
        SoakHours,
        LeadTimeDays,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RecipeSteps {
        Table,
        Id,
        RecipeId,
        Sequence,
        Description,
        DurationValue,
        DurationUnit,
    }

    #[derive(DeriveIden)]
    enum Varieties {
        Table,
        Id,
        Name,
        SeedPerTray,
        SeedUnit,
    }
}

mod m20240101_000002_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SeedBatches::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeedBatches::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SeedBatches::FarmId).uuid().not_null())
                        .col(ColumnDef::new(SeedBatches::VarietyId).uuid().not_null())
                        .col(ColumnDef::new(SeedBatches::LotCode).string().not_null())
                        .col(
                            ColumnDef::new(SeedBatches::RemainingGrams)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SeedBatches::PurchaseDate).date().not_null())
                        .col(
                            ColumnDef::new(SeedBatches::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SeedBatches::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seed_batches_farm_variety")
                        .table(SeedBatches::Table)
                        .col(SeedBatches::FarmId)
                        .col(SeedBatches::VarietyId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::FarmId).uuid().not_null())
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::DeliveryNotes).string().null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SeedBatches::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SeedBatches {
        Table,
        Id,
        FarmId,
        VarietyId,
        LotCode,
        RemainingGrams,
        PurchaseDate,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
        FarmId,
        Name,
        DeliveryNotes,
        CreatedAt,
    }
}

mod m20240101_000003_create_tray_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_tray_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Trays::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Trays::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Trays::FarmId).uuid().not_null())
                        .col(ColumnDef::new(Trays::RecipeId).uuid().not_null())
                        .col(ColumnDef::new(Trays::BatchId).uuid().null())
                        .col(ColumnDef::new(Trays::CustomerId).uuid().null())
                        .col(ColumnDef::new(Trays::SowDate).date().not_null())
                        .col(ColumnDef::new(Trays::HarvestDate).date().null())
                        .col(ColumnDef::new(Trays::YieldGrams).decimal().null())
                        .col(
                            ColumnDef::new(Trays::Status)
                                .string_len(16)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Trays::LossReason).string().null())
                        .col(
                            ColumnDef::new(Trays::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Trays::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_trays_farm_sow_date")
                        .table(Trays::Table)
                        .col(Trays::FarmId)
                        .col(Trays::SowDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TraySteps::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TraySteps::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TraySteps::TrayId).uuid().not_null())
                        .col(
                            ColumnDef::new(TraySteps::StepDescription)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TraySteps::Sequence).integer().not_null())
                        .col(
                            ColumnDef::new(TraySteps::ScheduledDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TraySteps::Status)
                                .string_len(16)
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(TraySteps::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tray_steps_schedule")
                        .table(TraySteps::Table)
                        .col(TraySteps::ScheduledDate)
                        .col(TraySteps::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TrayRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrayRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrayRequests::FarmId).uuid().not_null())
                        .col(ColumnDef::new(TrayRequests::RecipeId).uuid().not_null())
                        .col(ColumnDef::new(TrayRequests::RecipeName).string().not_null())
                        .col(ColumnDef::new(TrayRequests::VarietyName).string().null())
                        .col(
                            ColumnDef::new(TrayRequests::StepsSnapshot)
                                .json()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrayRequests::Quantity).integer().not_null())
                        .col(ColumnDef::new(TrayRequests::SowDate).date().not_null())
                        .col(ColumnDef::new(TrayRequests::BatchId).uuid().null())
                        .col(
                            ColumnDef::new(TrayRequests::Status)
                                .string_len(16)
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(TrayRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TrayRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tray_requests_farm_status")
                        .table(TrayRequests::Table)
                        .col(TrayRequests::FarmId)
                        .col(TrayRequests::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TrayRequests::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TraySteps::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Trays::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Trays {
        Table,
        Id,
        FarmId,
        RecipeId,
        BatchId,
        CustomerId,
        SowDate,
        HarvestDate,
        YieldGrams,
        Status,
        LossReason,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TraySteps {
        Table,
        Id,
        TrayId,
        StepDescription,
        Sequence,
        ScheduledDate,
        Status,
        CompletedAt,
    }

    #[derive(DeriveIden)]
    enum TrayRequests {
        Table,
        Id,
        FarmId,
        RecipeId,
        RecipeName,
        VarietyName,
        StepsSnapshot,
        Quantity,
        SowDate,
        BatchId,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_schedule_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_schedule_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StandingOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StandingOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StandingOrders::FarmId).uuid().not_null())
                        .col(
                            ColumnDef::new(StandingOrders::CustomerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrders::DeliveryWeekday)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrders::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StandingOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StandingOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StandingOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrderLines::StandingOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrderLines::RecipeId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrderLines::ProductName)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StandingOrderLines::TrayCount)
                                .decimal()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaskCompletions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaskCompletions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaskCompletions::FarmId).uuid().not_null())
                        .col(
                            ColumnDef::new(TaskCompletions::TaskType)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskCompletions::TaskDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaskCompletions::RecipeId).uuid().not_null())
                        .col(
                            ColumnDef::new(TaskCompletions::CustomerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskCompletions::ProductName)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(TaskCompletions::Status)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaskCompletions::Quantity).integer().null())
                        .col(
                            ColumnDef::new(TaskCompletions::CompletedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // The idempotence boundary: one ledger row per logical task
            manager
                .create_index(
                    Index::create()
                        .name("uq_task_completions_key")
                        .table(TaskCompletions::Table)
                        .col(TaskCompletions::FarmId)
                        .col(TaskCompletions::TaskType)
                        .col(TaskCompletions::TaskDate)
                        .col(TaskCompletions::RecipeId)
                        .col(TaskCompletions::CustomerId)
                        .col(TaskCompletions::ProductName)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceTasks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceTasks::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaintenanceTasks::FarmId).uuid().not_null())
                        .col(
                            ColumnDef::new(MaintenanceTasks::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceTasks::Weekday)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceTasks::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceTasks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaskCompletions::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(StandingOrderLines::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(StandingOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StandingOrders {
        Table,
        Id,
        FarmId,
        CustomerId,
        DeliveryWeekday,
        Active,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum StandingOrderLines {
        Table,
        Id,
        StandingOrderId,
        RecipeId,
        ProductName,
        TrayCount,
    }

    #[derive(DeriveIden)]
    enum TaskCompletions {
        Table,
        Id,
        FarmId,
        TaskType,
        TaskDate,
        RecipeId,
        CustomerId,
        ProductName,
        Status,
        Quantity,
        CompletedAt,
    }

    #[derive(DeriveIden)]
    enum MaintenanceTasks {
        Table,
        Id,
        FarmId,
        Description,
        Weekday,
        Active,
    }
}
