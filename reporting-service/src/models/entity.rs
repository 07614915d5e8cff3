//! Business parties and their optional client/supplier profiles.

use super::normalize::text_or_default;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw `ent_maeentidad` row.
#[derive(Debug, Clone, Default, FromRow)]
pub struct EntityRow {
    pub entnroid: i32,
    pub entnombr: Option<String>,
    pub entemail: Option<String>,
    pub entrazsoc: Option<String>,
    pub entdomic: Option<String>,
    pub entlocal: Option<String>,
    pub entprovi: Option<String>,
    pub entcodpo: Option<String>,
    pub enttelef: Option<String>,
    pub enttelef2: Option<String>,
    pub entcuit: Option<String>,
    pub entactec: Option<String>,
    pub entcodigo: Option<String>,
    pub entsedronar: Option<String>,
    pub entuslog: Option<String>,
    pub entfelog: Option<NaiveDateTime>,
}

/// Business party as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "Entnroid")]
    pub id: i32,
    #[serde(rename = "Entnombr")]
    pub name: String,
    #[serde(rename = "Entemail")]
    pub email: String,
    #[serde(rename = "EntRazSoc")]
    pub legal_name: String,
    #[serde(rename = "EntDomic")]
    pub street: String,
    #[serde(rename = "EntLocal")]
    pub locality: String,
    #[serde(rename = "EntProvi")]
    pub province: String,
    #[serde(rename = "EntCodPo")]
    pub postal_code: String,
    #[serde(rename = "EntTelef")]
    pub phone: String,
    #[serde(rename = "EntTelef2")]
    pub phone_alt: String,
    #[serde(rename = "EntCUIT")]
    pub tax_id: String,
    #[serde(rename = "EntActEc")]
    pub activity_code: String,
    #[serde(rename = "EntCodigo")]
    pub code: String,
    #[serde(rename = "EntSedronar")]
    pub sedronar_code: String,
    #[serde(rename = "EntUsLog")]
    pub audit_user: String,
    #[serde(rename = "EntFeLog")]
    pub audit_at: Option<NaiveDateTime>,
}

impl From<EntityRow> for Entity {
    fn from(row: EntityRow) -> Self {
        Self {
            id: row.entnroid,
            name: text_or_default(row.entnombr),
            email: text_or_default(row.entemail),
            legal_name: text_or_default(row.entrazsoc),
            street: text_or_default(row.entdomic),
            locality: text_or_default(row.entlocal),
            province: text_or_default(row.entprovi),
            postal_code: text_or_default(row.entcodpo),
            phone: text_or_default(row.enttelef),
            phone_alt: text_or_default(row.enttelef2),
            tax_id: text_or_default(row.entcuit),
            activity_code: text_or_default(row.entactec),
            code: text_or_default(row.entcodigo),
            sedronar_code: text_or_default(row.entsedronar),
            audit_user: text_or_default(row.entuslog),
            audit_at: row.entfelog,
        }
    }
}

/// Raw `clie_maeclientes` row, joined with the owning entity's name.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ClientProfileRow {
    pub clinroid: i32,
    pub entnroid: i32,
    pub entnombr: Option<String>,
    pub cliconta: Option<String>,
    pub clinotas: Option<String>,
    pub cliestad: Option<String>,
    pub clicodigo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(rename = "CliNroId")]
    pub id: i32,
    #[serde(rename = "Entnroid")]
    pub entity_id: i32,
    #[serde(rename = "Entnombr")]
    pub entity_name: String,
    #[serde(rename = "CliConta")]
    pub contact: String,
    #[serde(rename = "CliNotas")]
    pub notes: String,
    #[serde(rename = "CliEstad")]
    pub status: String,
    #[serde(rename = "CliCodigo")]
    pub code: String,
}

impl From<ClientProfileRow> for ClientProfile {
    fn from(row: ClientProfileRow) -> Self {
        Self {
            id: row.clinroid,
            entity_id: row.entnroid,
            entity_name: text_or_default(row.entnombr),
            contact: text_or_default(row.cliconta),
            notes: text_or_default(row.clinotas),
            status: text_or_default(row.cliestad),
            code: text_or_default(row.clicodigo),
        }
    }
}

/// Raw `prov_maeprov` row, joined with the owning entity's name.
#[derive(Debug, Clone, Default, FromRow)]
pub struct SupplierProfileRow {
    pub pronroid: i32,
    pub entnroid: i32,
    pub entnombr: Option<String>,
    pub procontac: Option<String>,
    pub proobser: Option<String>,
    pub proestad: Option<String>,
    pub prorubcon: Option<String>,
    pub prodocideven: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProfile {
    #[serde(rename = "ProNroId")]
    pub id: i32,
    #[serde(rename = "Entnroid")]
    pub entity_id: i32,
    #[serde(rename = "Entnombr")]
    pub entity_name: String,
    #[serde(rename = "ProContac")]
    pub contact: String,
    #[serde(rename = "ProObser")]
    pub observations: String,
    #[serde(rename = "ProEstad")]
    pub status: String,
    #[serde(rename = "ProRubCon")]
    pub category: String,
    #[serde(rename = "ProDocIdeVen")]
    pub vendor_document: String,
}

impl From<SupplierProfileRow> for SupplierProfile {
    fn from(row: SupplierProfileRow) -> Self {
        Self {
            id: row.pronroid,
            entity_id: row.entnroid,
            entity_name: text_or_default(row.entnombr),
            contact: text_or_default(row.procontac),
            observations: text_or_default(row.proobser),
            status: text_or_default(row.proestad),
            category: text_or_default(row.prorubcon),
            vendor_document: text_or_default(row.prodocideven),
        }
    }
}

/// Input for the demo seeding endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntity {
    pub nombre: String,
    pub email: String,
}
