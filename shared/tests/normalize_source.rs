mod common;

use common::{EXPORT_HEADERS, export_csv, render_csv, sample_rows, station_row};
use shared::smp::{NormalizeError, normalize, normalize_reader};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn normalizes_sample_export_in_source_order() {
    let csv = export_csv(&sample_rows());
    let normalized = normalize_reader(csv.as_bytes()).unwrap();

    assert_eq!(normalized.rows_read, 4);
    assert_eq!(normalized.rows_dropped(), 0);
    let ids: Vec<_> = normalized.records.iter().map(|r| r.station_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);

    let first = &normalized.records[0];
    assert_eq!(first.uf, "SP");
    assert_eq!(first.municipality, "São Paulo-SP");
    assert_eq!(first.neighborhood, "Sé");
    assert_eq!(first.address, "Rua Direita");
    assert_eq!(first.operator, "TELEFONICA BRASIL S.A.");
    assert_eq!(first.latitude, -23.5505);
    assert_eq!(first.longitude, -46.6333);
    assert_eq!(first.latitude_text, "23S3301");
    assert_eq!(first.freq_tx_mhz, Some(2110.5));
    assert_eq!(first.freq_rx_mhz, Some(1920.5));
    assert_eq!(first.emission_designation, "5M00G7W");
    assert_eq!(first.range_band, "2100");
    assert_eq!(first.sub_band, "A");
    assert_eq!(first.postal_code, "01002000");
    assert_eq!(first.address_complement, "");
}

#[test]
fn mandatory_fields_are_always_present() {
    let rows = vec![
        station_row(&[("Número Estação", "1")]),
        station_row(&[("Número Estação", "2"), ("UF", " ")]),
        station_row(&[("Número Estação", "3"), ("Município-UF", "")]),
        station_row(&[("Número Estação", "4"), ("EndBairro", "")]),
        station_row(&[("Número Estação", "5"), ("EnderecoEstacao", "   ")]),
        station_row(&[("Número Estação", "6"), ("Longitude decimal", "west")]),
        station_row(&[("Número Estação", "7")]),
    ];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    let ids: Vec<_> = normalized.records.iter().map(|r| r.station_id).collect();
    assert_eq!(ids, vec![Some(1), Some(7)]);
    assert_eq!(normalized.rows_dropped(), 5);
    for record in &normalized.records {
        assert!(!record.uf.is_empty());
        assert!(!record.municipality.is_empty());
        assert!(!record.neighborhood.is_empty());
        assert!(!record.address.is_empty());
        assert!(record.latitude.is_finite());
        assert!(record.longitude.is_finite());
    }
}

#[test]
fn unparseable_station_id_is_absent_but_row_is_kept() {
    let rows = vec![station_row(&[("Número Estação", "abc")])];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    assert_eq!(normalized.records.len(), 1);
    assert_eq!(normalized.records[0].station_id, None);
}

#[test]
fn unparseable_frequencies_are_absent() {
    let rows = vec![station_row(&[("FreqTxMHz", "n/a"), ("FreqRxMHz", "")])];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    assert_eq!(normalized.records[0].freq_tx_mhz, None);
    assert_eq!(normalized.records[0].freq_rx_mhz, None);
}

#[test]
fn empty_latitude_drops_the_row() {
    let rows = vec![
        station_row(&[("Número Estação", "1"), ("Latitude decimal", "")]),
        station_row(&[("Número Estação", "2")]),
    ];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    assert_eq!(normalized.rows_read, 2);
    assert_eq!(normalized.records.len(), 1);
    assert_eq!(normalized.records[0].station_id, Some(2));
}

#[test]
fn text_cells_are_trimmed() {
    let rows = vec![station_row(&[
        ("EndBairro", "  Centro  "),
        ("Empresa Estação", " CLARO S.A. "),
        ("UF", "SP "),
    ])];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    let record = &normalized.records[0];
    assert_eq!(record.neighborhood, "Centro");
    assert_eq!(record.operator, "CLARO S.A.");
    assert_eq!(record.uf, "SP");
}

#[test]
fn numeric_looking_text_stays_text() {
    let rows = vec![station_row(&[("EndNumero", " 0042 "), ("Cep", "01002000")])];
    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    assert_eq!(normalized.records[0].address_number, "0042");
    assert_eq!(normalized.records[0].postal_code, "01002000");
}

#[test]
fn missing_uf_column_is_a_schema_error() {
    let headers: Vec<&str> = EXPORT_HEADERS
        .iter()
        .copied()
        .filter(|h| *h != "UF")
        .collect();
    let csv = render_csv(&headers, &sample_rows());

    match normalize_reader(csv.as_bytes()) {
        Err(NormalizeError::MissingColumns(missing)) => assert_eq!(missing, vec!["UF"]),
        other => panic!("expected missing column error, got {other:?}"),
    }
}

#[test]
fn every_missing_column_is_reported() {
    let csv = "UF;Município-UF\nSP;São Paulo-SP\n";
    match normalize_reader(csv.as_bytes()) {
        Err(NormalizeError::MissingColumns(missing)) => {
            assert_eq!(missing.len(), 18);
            assert!(missing.contains(&"Latitude decimal".to_string()));
            assert!(!missing.contains(&"UF".to_string()));
        }
        other => panic!("expected missing column error, got {other:?}"),
    }
}

#[test]
fn headers_tolerate_padding_and_byte_order_mark() {
    let padded: Vec<String> = EXPORT_HEADERS.iter().map(|h| format!(" {h} ")).collect();
    let padded: Vec<&str> = padded.iter().map(String::as_str).collect();
    let mut csv = String::from("\u{feff}");
    csv.push_str(&render_csv(&padded, &[]));
    for row in sample_rows() {
        let line = EXPORT_HEADERS
            .iter()
            .map(|h| row[*h].as_str())
            .collect::<Vec<_>>()
            .join(";");
        csv.push_str(&line);
        csv.push('\n');
    }

    let normalized = normalize_reader(csv.as_bytes()).unwrap();
    assert_eq!(normalized.records.len(), 4);
}

#[test]
fn truncated_row_is_dropped_and_the_rest_survive() {
    let mut csv = export_csv(&sample_rows());
    csv.push_str("LIC;9;CLARO S.A.;SP\n");

    let normalized = normalize_reader(csv.as_bytes()).unwrap();

    assert_eq!(normalized.rows_read, 5);
    assert_eq!(normalized.rows_dropped(), 1);
    let ids: Vec<_> = normalized.records.iter().map(|r| r.station_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
}

#[test]
fn overlong_row_aborts_the_batch() {
    let mut csv = export_csv(&sample_rows()[..1]);
    let extra = format!("{};surplus\n", csv.lines().nth(1).unwrap());
    csv.push_str(&extra);

    assert!(matches!(
        normalize_reader(csv.as_bytes()),
        Err(NormalizeError::TooManyFields {
            line: 3,
            found: 22,
            expected: 21
        })
    ));
}

#[test]
fn out_of_range_coordinates_drop_the_row() {
    let rows = vec![
        station_row(&[("Número Estação", "1")]),
        station_row(&[("Número Estação", "2"), ("Latitude decimal", "-95.0")]),
        station_row(&[("Número Estação", "3"), ("Longitude decimal", "200.5")]),
        station_row(&[("Número Estação", "4"), ("Latitude decimal", "-90.0")]),
    ];

    let normalized = normalize_reader(export_csv(&rows).as_bytes()).unwrap();

    assert_eq!(normalized.rows_read, 4);
    let ids: Vec<_> = normalized.records.iter().map(|r| r.station_id).collect();
    assert_eq!(ids, vec![Some(1), Some(4)]);
    assert_eq!(normalized.records[1].latitude, -90.0);
}

#[test]
fn reads_from_a_file_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(export_csv(&sample_rows()).as_bytes())
        .unwrap();

    let normalized = normalize(file.path()).unwrap();
    assert_eq!(normalized.records.len(), 4);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = normalize(dir.path().join("Estacoes_SMP.csv"));
    assert!(matches!(result, Err(NormalizeError::Open { .. })));
}
