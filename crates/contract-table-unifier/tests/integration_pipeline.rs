mod common;

use std::io::Cursor;
use std::process::Command;

use calamine::{Reader, Xlsx, open_workbook_from_rs};
use contract_table_unifier::{
    Conversion, ExtractWarningCode, UnifyError, UnifyOptions, extract_pdf_bytes_to_xlsx,
    extract_pdf_to_file, unify_pdf_bytes,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const HEADER: &str = "CÓDIGO  DESCRIÇÃO  VALOR";

fn sheet_rows(xlsx: &[u8]) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(xlsx.to_vec())).expect("workbook should open");
    let range = workbook
        .worksheet_range("Tabelas Unificadas")
        .expect("unified sheet should exist");
    range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

fn convert(pages: &[Vec<&str>]) -> Conversion {
    let pdf = common::build_test_pdf(pages).expect("PDF fixture should be created");
    extract_pdf_bytes_to_xlsx(&pdf, &UnifyOptions::default()).expect("conversion should succeed")
}

#[test]
fn single_table_becomes_two_row_sheet() {
    let conversion = convert(&[vec![
        "Anexo I - Tabela de preços:",
        HEADER,
        "001  Item A  10.00",
        "002  Item B  20.00",
    ]]);

    let Conversion::Converted {
        table,
        xlsx,
        report,
    } = conversion
    else {
        panic!("expected a converted table");
    };

    assert_eq!(report.row_count, 2);
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        sheet_rows(&xlsx),
        vec![
            vec!["CÓDIGO", "DESCRIÇÃO", "VALOR"],
            vec!["001", "Item A", "10.00"],
            vec!["002", "Item B", "20.00"],
        ]
    );
}

#[test]
fn repeated_table_on_two_pages_is_deduplicated() {
    let page = vec![HEADER, "001  Item A  10.00"];
    let conversion = convert(&[page.clone(), page]);

    let report = conversion.report();
    assert_eq!(report.table_count, 2, "report: {report:?}");
    assert_eq!(report.row_count, 1, "report: {report:?}");
}

#[test]
fn rows_keep_page_order() {
    let conversion = convert(&[
        vec![HEADER, "010  Instalação  1.500,00"],
        vec![HEADER, "020  Manutenção mensal  320,00", "030  Suporte  99,90"],
    ]);

    let Conversion::Converted { table, .. } = conversion else {
        panic!("expected a converted table");
    };
    let codes = table
        .rows
        .iter()
        .map(|row| row.code.as_str())
        .collect::<Vec<_>>();
    assert_eq!(codes, vec!["010", "020", "030"]);
    assert_eq!(table.rows[0].description, "Instalação");
}

#[test]
fn tables_without_header_token_produce_no_download() {
    let conversion = convert(&[vec![
        "NOME  CARGO  SALÁRIO",
        "Ana  Gerente  10.000,00",
        "Rui  Analista  6.000,00",
    ]]);

    let Conversion::NoMatchingTables(report) = conversion else {
        panic!("expected no matching tables");
    };
    assert_eq!(report.row_count, 0);
    assert!(
        report
            .warnings
            .iter()
            .any(|warning| warning.code == ExtractWarningCode::NoMatchingTables)
    );
}

#[test]
fn corrupted_upload_fails_with_message() {
    let error = extract_pdf_bytes_to_xlsx(b"this is not a pdf", &UnifyOptions::default())
        .expect_err("garbage input should fail");

    assert!(matches!(error, UnifyError::PdfLoad(_)), "error: {error:?}");
    assert!(error.to_string().starts_with("failed to load PDF"));
}

#[test]
fn cell_positioned_table_keeps_its_columns() {
    let pdf = common::build_positioned_test_pdf(&[vec![
        vec!["Anexo II - Serviços:"],
        vec!["CÓDIGO", "DESCRIÇÃO", "VALOR"],
        vec!["001", "Item A", "10.00"],
        vec!["", "Item sem código", "5,00"],
        vec!["   ", "Código em branco", "1,00"],
        vec!["002", "Parafuso de aço", "3,50"],
        vec!["001", "Item A", "10.00"],
    ]])
    .expect("PDF fixture should be created");

    let conversion =
        extract_pdf_bytes_to_xlsx(&pdf, &UnifyOptions::default()).expect("conversion should succeed");
    let Conversion::Converted { xlsx, report, .. } = conversion else {
        panic!("expected a converted table");
    };

    assert_eq!(report.table_count, 1, "report: {report:?}");
    assert_eq!(
        sheet_rows(&xlsx),
        vec![
            vec!["CÓDIGO", "DESCRIÇÃO", "VALOR"],
            vec!["001", "Item A", "10.00"],
            vec!["002", "Parafuso de aço", "3,50"],
        ]
    );
}

#[test]
fn single_spaced_rows_keep_multi_word_descriptions() {
    let conversion = convert(&[vec![
        "CÓDIGO DESCRIÇÃO VALOR",
        "001 Item A 10.00",
        "002 Parafuso de aço 3,50",
    ]]);

    let Conversion::Converted { table, .. } = conversion else {
        panic!("expected a converted table");
    };
    let rows = table
        .rows
        .iter()
        .map(|row| row.fields())
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            ["001", "Item A", "10.00"],
            ["002", "Parafuso de aço", "3,50"],
        ]
    );
}

#[test]
fn pdf_with_missing_font_resource_is_still_read() {
    let pdf = common::build_missing_font_pdf(&["ITEM  SERVICO  PRECO", "10  Limpeza  99,90"])
        .expect("PDF fixture should be created");
    let options = UnifyOptions {
        header_token: "item".to_string(),
        ..UnifyOptions::default()
    };

    let (outcome, report) = unify_pdf_bytes(&pdf, &options).expect("document should be read");

    assert_eq!(report.row_count, 1, "report: {report:?}");
    let table = outcome.into_table().expect("table should match");
    assert_eq!(table.rows[0].description, "Limpeza");
}

#[test]
fn cli_reads_pdf_with_missing_font_resource() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("fonte-ausente.pdf");
    let output = dir.path().join("fonte-ausente.xlsx");
    let pdf = common::build_missing_font_pdf(&["ITEM  SERVICO  PRECO", "10  Limpeza  99,90"])
        .expect("PDF fixture should be created");
    common::write_pdf(&input, &pdf).expect("PDF fixture should be written");

    let status = Command::new(env!("CARGO_BIN_EXE_pdf2xlsx"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
            "--header-token",
            "ITEM",
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(0));
    assert!(output.exists());
}

#[test]
fn cli_writes_xlsx_and_exits_zero() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("contrato.pdf");
    let output = dir.path().join("tabelas_unificadas.xlsx");
    common::create_test_pdf(&input, &[vec![HEADER, "001  Item A  10.00"]])
        .expect("PDF fixture should be created");

    let status = Command::new(env!("CARGO_BIN_EXE_pdf2xlsx"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(0));
    let xlsx = std::fs::read(&output).expect("xlsx should be written");
    assert_eq!(sheet_rows(&xlsx).len(), 2);
}

#[test]
fn cli_exits_with_code_2_when_no_table_matches() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("sem-tabela.pdf");
    let output = dir.path().join("sem-tabela.xlsx");
    common::create_test_pdf(&input, &[vec!["Contrato sem tabelas de preço."]])
        .expect("PDF fixture should be created");

    let status = Command::new(env!("CARGO_BIN_EXE_pdf2xlsx"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
    assert!(!output.exists());
}

#[test]
fn csv_output_uses_same_table() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("contrato.pdf");
    let output = dir.path().join("tabelas.csv");
    common::create_test_pdf(&input, &[vec![HEADER, "001  Item A  10.00"]])
        .expect("PDF fixture should be created");

    let report = extract_pdf_to_file(&input, &output, true, &UnifyOptions::default())
        .expect("extraction should succeed");

    let csv = std::fs::read_to_string(&output).expect("CSV should be readable");
    assert_eq!(csv, "CÓDIGO,DESCRIÇÃO,VALOR\n001,Item A,10.00\n", "report: {report:?}");
}
