pub use super::insumo::Entity as Insumo;
