#![allow(dead_code)]

use shared::{SqliteConfig, initialize_db};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tempfile::TempDir;

/// Columns as Anatel orders them, plus one the normalizer must ignore.
pub const EXPORT_HEADERS: [&str; 21] = [
    "Status.",
    "Número Estação",
    "Empresa Estação",
    "UF",
    "Município-UF",
    "EnderecoEstacao",
    "EndBairro",
    "EndNumero",
    "EndComplemento",
    "Cep",
    "Latitude",
    "Longitude",
    "Latitude decimal",
    "Longitude decimal",
    "Tecnologia",
    "Geração",
    "FreqTxMHz",
    "FreqRxMHz",
    "Designação Emissão",
    "Faixa Estação",
    "Subfaixa Estação",
];

pub fn station_row(overrides: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut row: BTreeMap<String, String> = [
        ("Status.", "LIC-LIC-01"),
        ("Número Estação", "1001"),
        ("Empresa Estação", "TELEFONICA BRASIL S.A."),
        ("UF", "SP"),
        ("Município-UF", "São Paulo-SP"),
        ("EnderecoEstacao", "Rua Direita"),
        ("EndBairro", "Sé"),
        ("EndNumero", "100"),
        ("EndComplemento", ""),
        ("Cep", "01002000"),
        ("Latitude", "23S3301"),
        ("Longitude", "46W3759"),
        ("Latitude decimal", "-23.5505"),
        ("Longitude decimal", "-46.6333"),
        ("Tecnologia", "WCDMA"),
        ("Geração", "3G"),
        ("FreqTxMHz", "2110.5"),
        ("FreqRxMHz", "1920.5"),
        ("Designação Emissão", "5M00G7W"),
        ("Faixa Estação", "2100"),
        ("Subfaixa Estação", "A"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        row.insert((*key).to_string(), (*value).to_string());
    }
    row
}

pub fn render_csv(headers: &[&str], rows: &[BTreeMap<String, String>]) -> String {
    let mut out = headers.join(";");
    out.push('\n');
    for row in rows {
        let line = headers
            .iter()
            .map(|h| row.get(*h).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(";");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn export_csv(rows: &[BTreeMap<String, String>]) -> String {
    render_csv(&EXPORT_HEADERS, rows)
}

/// A handful of stations across two states and three operators.
pub fn sample_rows() -> Vec<BTreeMap<String, String>> {
    vec![
        station_row(&[("Número Estação", "1")]),
        station_row(&[
            ("Número Estação", "2"),
            ("UF", "RJ"),
            ("Município-UF", "Rio de Janeiro-RJ"),
            ("EndBairro", "Centro"),
            ("Latitude decimal", "-22.9068"),
            ("Longitude decimal", "-43.1729"),
            ("Empresa Estação", "CLARO S.A."),
            ("Geração", "4G"),
            ("Tecnologia", "LTE"),
        ]),
        station_row(&[
            ("Número Estação", "3"),
            ("EndBairro", "Pinheiros"),
            ("Latitude decimal", "-23.5670"),
            ("Longitude decimal", "-46.6920"),
            ("Empresa Estação", "CLARO S.A."),
            ("Geração", "4G"),
            ("Tecnologia", "LTE"),
        ]),
        station_row(&[
            ("Número Estação", "4"),
            ("EndBairro", "Mooca"),
            ("Latitude decimal", "-23.5600"),
            ("Longitude decimal", "-46.5990"),
            ("Empresa Estação", "TIM S A"),
            ("Geração", "5G"),
            ("Tecnologia", "NR"),
        ]),
    ]
}

pub async fn file_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let config = SqliteConfig {
        database_url: format!("sqlite://{}", dir.path().join("estacoes_smp.db").display()),
        max_connections: 2,
    };
    let pool = initialize_db(&config, true).await.unwrap();
    (dir, pool)
}
