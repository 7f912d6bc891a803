use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Closed sets: market sessions, classification notes, hour tokens
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("market_enum"))
                    .values([Alias::new("MDA"), Alias::new("MTR")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("note_enum"))
                    .values(note_values())
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("hour_enum"))
                    .values(hour_values())
                    .to_owned(),
            )
            .await?;

        // Create insumo table
        manager
            .create_table(
                Table::create()
                    .table(Insumo::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Insumo::Date).date().not_null())
                    .col(ColumnDef::new(Insumo::UnitId).uuid().not_null())
                    .col(
                        ColumnDef::new(Insumo::Market)
                            .enumeration(Alias::new("market_enum"), market_values())
                            .not_null()
                            .default("MDA"),
                    )
                    .col(
                        ColumnDef::new(Insumo::Hour)
                            .enumeration(Alias::new("hour_enum"), hour_values())
                            .not_null(),
                    )
                    .col(ColumnDef::new(Insumo::Min).decimal_len(7, 3).not_null())
                    .col(ColumnDef::new(Insumo::Max).decimal_len(7, 3).not_null())
                    .col(ColumnDef::new(Insumo::ShareFt1).decimal_len(4, 3).null())
                    .col(ColumnDef::new(Insumo::ShareFt2).decimal_len(4, 3).null())
                    .col(
                        ColumnDef::new(Insumo::Note)
                            .enumeration(Alias::new("note_enum"), note_values())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Insumo::Agc)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Insumo::PriceFt1)
                            .decimal_len(7, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Insumo::PriceFt2).decimal_len(7, 3).null())
                    .col(
                        ColumnDef::new(Insumo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(Insumo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_insumo")
                            .col(Insumo::Date)
                            .col(Insumo::UnitId)
                            .col(Insumo::Hour)
                            .col(Insumo::Market),
                    )
                    .to_owned(),
            )
            .await?;

        // Range checks mirror input validation as a last line of defense
        let db = manager.get_connection();
        db.execute_unprepared(
            r#"
            ALTER TABLE insumo
                ADD CONSTRAINT min_check CHECK ("min" >= 0 AND "min" <= 1000.000),
                ADD CONSTRAINT max_check CHECK ("max" >= 0 AND "max" <= 1000.000),
                ADD CONSTRAINT share_ft1_check CHECK (share_ft1 >= 0 AND share_ft1 <= 1.000),
                ADD CONSTRAINT share_ft2_check CHECK (share_ft2 >= 0 AND share_ft2 <= 1.000),
                ADD CONSTRAINT price_ft1_check CHECK (price_ft1 >= 0 AND price_ft1 <= 1000.000),
                ADD CONSTRAINT price_ft2_check CHECK (price_ft2 >= 0 AND price_ft2 <= 1000.000);
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Insumo::Table).to_owned())
            .await?;

        for name in ["hour_enum", "note_enum", "market_enum"] {
            manager
                .drop_type(Type::drop().if_exists().name(Alias::new(name)).to_owned())
                .await?;
        }

        Ok(())
    }
}

fn market_values() -> Vec<Alias> {
    vec![Alias::new("MDA"), Alias::new("MTR")]
}

fn note_values() -> Vec<Alias> {
    ["c_amb", "ca_aje", "r_com", "decrem", "sa_fda", "sa_prg", "prueba"]
        .into_iter()
        .map(Alias::new)
        .collect()
}

/// Hour tokens '1' through '25'; 25 covers the daylight-saving fold hour.
fn hour_values() -> Vec<Alias> {
    (1..=25).map(|h: u8| Alias::new(h.to_string())).collect()
}

#[derive(Iden)]
enum Insumo {
    Table,
    Date,
    UnitId,
    Market,
    Hour,
    Min,
    Max,
    ShareFt1,
    ShareFt2,
    Note,
    Agc,
    PriceFt1,
    PriceFt2,
    CreatedAt,
    UpdatedAt,
}
