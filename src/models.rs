use serde::{Deserialize, Serialize};

pub const UPLOAD_FIELD: &str = "file";
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const PREVIEW_ROW_LIMIT: usize = 20;

pub const IDLE_MESSAGE: &str = "Faça upload de um arquivo PDF para iniciar a conversão.";
pub const NO_TABLES_MESSAGE: &str = "Nenhuma tabela contendo 'CÓDIGO' foi encontrada neste PDF.";
pub const FAILURE_PREFIX: &str = "Erro ao processar o PDF";

#[must_use]
pub fn success_message(row_count: usize) -> String {
    format!("Extração concluída! {row_count} linhas extraídas.")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewRow {
    pub code: String,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewResponse {
    pub status: RunStatus,
    pub message: String,
    pub row_count: usize,
    pub table_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub preview: Vec<PreviewRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
