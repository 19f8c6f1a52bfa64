/*!

This is the long-form manual for `participant_draw` and `sorteo`.

## Input formats

The roster is a table whose first row holds the column headers. The following
formats are supported:
* `excel` Excel workbooks (.xlsx, .xlsm, .xls) and OpenDocument spreadsheets (.ods)
* `csv` Comma Separated Values, UTF-8

The input type is inferred from the file extension. It can be forced with the
`--input-type` flag or the `provider` field of the configuration.

### Recognized columns

Headers are compared after removing surrounding whitespace. The comparison is
otherwise exact (accents and case matter). Columns with other headers are ignored.

| Field         | Accepted headers                                              |
|---------------|---------------------------------------------------------------|
| `number`      | `Número`, `Numero`                                            |
| `last_name`   | `Apellido`                                                    |
| `first_name`  | `Nombre`, `Nombres`                                           |
| `document_id` | `Número de Documento`, `Documento`, `DNI`                     |
| `phone`       | `Número de Teléfono`, `Teléfono`, `Telefono`, `Celular`        |
| `email`       | `Correo Electrónico`, `Email`, `E-mail`, `Correo`             |

A field without a matching column is left empty for every participant. When
two columns match the same field, the leftmost one is used.

## The draw

The whole roster is shuffled. The first participants of the shuffled roster are
pre-registered (`--selected`, 60 by default), the next ones form the waitlist
(`--alternates`, 20 by default). The remaining participants are not reported.
The draw fails if the roster has fewer participants than requested in total.

Passing `--seed` makes the draw reproducible: the same roster and the same seed
always lead to the same outcome.

## Outputs

The export columns are always, in this order: `Número`, `Apellido`, `Nombres`,
`Número de Documento`, `Teléfono`, `Correo Electrónico`.

* `--out-xlsx` a workbook with the sheets `Preinscritos` and `Reservas`
* `--out-pdf` a document with the sections `Preinscritos` and `Reservas`
* `--out-json` the results in JSON, which can be exported again later with `--results`

## Configuration

All the options can also be given in a JSON file with `--config`. Flags passed on the
command line take precedence. Relative paths are resolved against the directory of the
configuration file.

```json
{
  "inputSource": { "filePath": "inscriptos.xlsx", "worksheetName": "Hoja1" },
  "rules": { "preRegistered": 60, "reserves": 20, "randomSeed": "2024" },
  "outputSettings": {
    "outputDirectory": "resultados",
    "xlsxFile": "resultados.xlsx",
    "pdfFile": "resultados.pdf",
    "jsonFile": "resultados.json"
  }
}
```

*/
