use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use super::filter::FilteredView;

/// Suggested name for the download.
pub const EXPORT_FILE_NAME: &str = "salarios_filtrados.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One exported line: the source columns plus the converted salary.
#[derive(Serialize)]
struct ExportRow<'a> {
    ano: i32,
    senioridade: &'a str,
    contrato: &'a str,
    tamanho_empresa: &'a str,
    cargo: &'a str,
    usd: f64,
    remoto: &'a str,
    residencia_iso3: Option<&'a str>,
    valor_convertido: f64,
}

/// Write the view as UTF-8, comma-delimited CSV with a header row.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    for (r, converted) in view.rows() {
        out.serialize(ExportRow {
            ano: r.year,
            senioridade: &r.seniority,
            contrato: &r.contract,
            tamanho_empresa: &r.company_size,
            cargo: &r.role,
            usd: r.base_salary,
            remoto: &r.remote,
            residencia_iso3: r.residence_iso3.as_deref(),
            valor_convertido: converted,
        })?;
    }
    if view.is_empty() {
        // serde only emits the header alongside the first row
        out.write_record([
            "ano",
            "senioridade",
            "contrato",
            "tamanho_empresa",
            "cargo",
            "usd",
            "remoto",
            "residencia_iso3",
            "valor_convertido",
        ])?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export the view to `path`.
pub fn save_csv(view: &FilteredView, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_csv(view, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{filter, FilterSpec};
    use crate::data::loader::parse_csv;
    use crate::data::model::fixtures;
    use crate::data::normalize::normalize;

    fn export_text(view: &FilteredView) -> String {
        let mut buf = Vec::new();
        write_csv(view, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn export_parses_back_to_the_same_rows() {
        let ds = Arc::new(fixtures::three_records());
        let view = normalize(filter(&ds, &FilterSpec::all(ds.dimensions())), 5.5);

        let text = export_text(&view);
        let reparsed = parse_csv(text.as_bytes()).unwrap();

        assert_eq!(reparsed.len(), view.len());
        let pairs = |it: Vec<(String, f64)>| -> BTreeSet<(String, u64)> {
            it.into_iter().map(|(r, s)| (r, s.to_bits())).collect()
        };
        let exported = pairs(view.rows().map(|(r, _)| (r.role.clone(), r.base_salary)).collect());
        let parsed = pairs(
            reparsed
                .records()
                .iter()
                .map(|r| (r.role.clone(), r.base_salary))
                .collect(),
        );
        assert_eq!(exported, parsed);
    }

    #[test]
    fn export_has_header_and_converted_column() {
        let ds = Arc::new(fixtures::three_records());
        let view = normalize(filter(&ds, &FilterSpec::all(ds.dimensions())), 2.0);
        let text = export_text(&view);

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3,valor_convertido")
        );
        assert_eq!(
            lines.next(),
            Some("2020,Senior,FT,Large,Data Scientist,100000.0,Remote,USA,200000.0")
        );
    }

    #[test]
    fn empty_view_exports_header_only() {
        let ds = Arc::new(fixtures::three_records());
        let view = filter(&ds, &FilterSpec::default());
        let text = export_text(&view);
        assert_eq!(text.lines().count(), 1);
        assert!(parse_csv(text.as_bytes()).unwrap().is_empty());
    }
}
