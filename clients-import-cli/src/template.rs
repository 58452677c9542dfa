pub const CONFIG_TEMPLATE: &str = r#"{
  // Semicolon-delimited client export. The first non-blank line is the header
  // and is skipped. Columns, in order:
  //   id; name; phone; email; nationality; notes; taxId; birthDate
  // Relative paths are resolved against the directory of this file.
  "inputPath": "cliente.csv",

  // Generated SQL script. An existing file is overwritten.
  "outputPath": "import_clients_data.sql",

  // Table the INSERT statements target (optionally schema-qualified)
  "table": "clients",

  // Field separator. Quotes are not interpreted, so fields must not contain it.
  "delimiter": ";"

  // Format of the birthDate column (chrono syntax, e.g. "%d/%m/%Y").
  // Leave unset to always write NULL birth dates.
  // "birthDateFormat": "%d/%m/%Y"
}
"#;
