//! Tests for the normalization pipeline

pub mod reshape_tests;

use crate::models::FileSource;

/// Export file in the `YYYY` / `YYYY.1` header form
pub fn export_source(name: &str) -> FileSource {
    FileSource::new(
        name,
        "Id;País;2019;2019.1;2020;2020.1\n\
         1;Alemanha;100;250.5;10;99.5\n\
         2;Angola;0;0;0;5\n\
         3;Argentina;0;0;0;0\n",
    )
}

/// The same export data with duplicated bare year headers
pub fn raw_export_source(name: &str) -> FileSource {
    FileSource::new(
        name,
        "Id;País;2019;2019;2020;2020\n\
         1;Alemanha;100;250.5;10;99.5\n\
         2;Angola;0;0;0;5\n\
         3;Argentina;0;0;0;0\n",
    )
}

pub fn commerce_source() -> FileSource {
    FileSource::new(
        "Comercio.csv",
        "id;control;Produto;2019;2020\n\
         1;VINHO DE MESA;VINHO DE MESA;1000;2000\n\
         2;vm_Tinto;Tinto;800;1500\n\
         3;vm_Branco;Branco;200;500\n\
         4;ESPUMANTES;ESPUMANTES;0;300\n\
         5;OUTROS PRODUTOS;OUTROS PRODUTOS;;0\n",
    )
}
