//! SeaORM entity for hourly market input records ("insumos")

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};

/// Market session the record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "market_enum")]
pub enum Market {
    #[sea_orm(string_value = "MDA")]
    #[serde(rename = "MDA")]
    Mda,
    #[sea_orm(string_value = "MTR")]
    #[serde(rename = "MTR")]
    Mtr,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Mda => "MDA",
            Market::Mtr => "MTR",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "MDA" => Some(Market::Mda),
            "MTR" => Some(Market::Mtr),
            _ => None,
        }
    }
}

/// Classification tag attached to every record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "note_enum")]
#[serde(rename_all = "snake_case")]
pub enum Note {
    #[sea_orm(string_value = "c_amb")]
    CAmb,
    #[sea_orm(string_value = "ca_aje")]
    CaAje,
    #[sea_orm(string_value = "r_com")]
    RCom,
    #[sea_orm(string_value = "decrem")]
    Decrem,
    #[sea_orm(string_value = "sa_fda")]
    SaFda,
    #[sea_orm(string_value = "sa_prg")]
    SaPrg,
    #[sea_orm(string_value = "prueba")]
    Prueba,
}

impl Note {
    pub fn from_token(s: &str) -> Option<Self> {
        Self::iter().find(|note| note.to_value() == s)
    }
}

/// Hour-of-day token, 1 through 25. Hour 25 accommodates the
/// daylight-saving fold on the long day of the year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "hour_enum")]
pub enum Hour {
    #[sea_orm(string_value = "1")]
    H1,
    #[sea_orm(string_value = "2")]
    H2,
    #[sea_orm(string_value = "3")]
    H3,
    #[sea_orm(string_value = "4")]
    H4,
    #[sea_orm(string_value = "5")]
    H5,
    #[sea_orm(string_value = "6")]
    H6,
    #[sea_orm(string_value = "7")]
    H7,
    #[sea_orm(string_value = "8")]
    H8,
    #[sea_orm(string_value = "9")]
    H9,
    #[sea_orm(string_value = "10")]
    H10,
    #[sea_orm(string_value = "11")]
    H11,
    #[sea_orm(string_value = "12")]
    H12,
    #[sea_orm(string_value = "13")]
    H13,
    #[sea_orm(string_value = "14")]
    H14,
    #[sea_orm(string_value = "15")]
    H15,
    #[sea_orm(string_value = "16")]
    H16,
    #[sea_orm(string_value = "17")]
    H17,
    #[sea_orm(string_value = "18")]
    H18,
    #[sea_orm(string_value = "19")]
    H19,
    #[sea_orm(string_value = "20")]
    H20,
    #[sea_orm(string_value = "21")]
    H21,
    #[sea_orm(string_value = "22")]
    H22,
    #[sea_orm(string_value = "23")]
    H23,
    #[sea_orm(string_value = "24")]
    H24,
    #[sea_orm(string_value = "25")]
    H25,
}

impl Hour {
    /// Integer hour index carried by this token.
    pub fn index(&self) -> u8 {
        self.to_value().parse().unwrap_or(0)
    }

    /// Token for an integer hour in [1,25].
    pub fn from_index(hour: u8) -> Option<Self> {
        Self::iter().find(|h| h.index() == hour)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insumo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub market: Market,
    #[sea_orm(primary_key, auto_increment = false)]
    pub hour: Hour,
    /// Lower dispatch bound in MW
    #[sea_orm(column_type = "Decimal(Some((7, 3)))")]
    pub min: Decimal,
    /// Upper dispatch bound in MW
    #[sea_orm(column_type = "Decimal(Some((7, 3)))")]
    pub max: Decimal,
    #[sea_orm(column_type = "Decimal(Some((4, 3)))", nullable)]
    pub share_ft1: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((4, 3)))", nullable)]
    pub share_ft2: Option<Decimal>,
    pub note: Note,
    /// Automatic generation control flag
    pub agc: bool,
    #[sea_orm(column_type = "Decimal(Some((7, 3)))")]
    pub price_ft1: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 3)))", nullable)]
    pub price_ft2: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
