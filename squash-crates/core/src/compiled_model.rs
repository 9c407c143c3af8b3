use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use xcsp_format::DocumentWriter;
use xcsp_format::Element;

use crate::CompilationStatistics;

/// The XCSP3 document of a compiled [`crate::Model`].
#[derive(Clone, Debug)]
pub struct CompiledModel {
    document: Element,
    file_stem: String,
    statistics: CompilationStatistics,
}

impl CompiledModel {
    pub(crate) fn new(
        document: Element,
        file_stem: String,
        statistics: CompilationStatistics,
    ) -> CompiledModel {
        CompiledModel {
            document,
            file_stem,
            statistics,
        }
    }

    /// The root `instance` element of the document.
    pub fn document(&self) -> &Element {
        &self.document
    }

    /// The name the document is written under, without extension: `model[-variant][-data…]`.
    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    pub fn statistics(&self) -> &CompilationStatistics {
        &self.statistics
    }

    /// The text of the document.
    pub fn to_xml(&self) -> Result<String, xcsp_format::Error> {
        let mut buffer = vec![];
        self.write(&mut buffer)?;

        String::from_utf8(buffer)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error).into())
    }

    /// Write the document to the given sink.
    pub fn write(&self, sink: impl Write) -> Result<(), xcsp_format::Error> {
        DocumentWriter::new(sink).write(&self.document)
    }

    /// Write the document to a file. With the `gzipped-output` feature, a path ending in `.gz` is
    /// compressed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), xcsp_format::Error> {
        let path = path.as_ref();
        let file = File::create(path)?;

        if path.extension().is_some_and(|extension| extension == "gz") {
            return self.write_gzipped(file);
        }

        self.write(file)
    }

    #[cfg(feature = "gzipped-output")]
    fn write_gzipped(&self, file: File) -> Result<(), xcsp_format::Error> {
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        self.write(&mut encoder)?;
        let _ = encoder.finish()?;

        Ok(())
    }

    #[cfg(not(feature = "gzipped-output"))]
    fn write_gzipped(&self, file: File) -> Result<(), xcsp_format::Error> {
        log::warn!("Writing an uncompressed document, the gzipped-output feature is disabled.");
        self.write(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Domain;
    use crate::CompileOptions;
    use crate::Model;

    fn compiled() -> CompiledModel {
        let mut model = Model::new("single").with_instance_name(Some("small"), ["3"]);
        let _ = model
            .new_named_variable("x", Domain::new(0..=2).expect("non-empty domain"))
            .expect("valid name");

        model
            .compile(&CompileOptions::default())
            .expect("model compiles")
    }

    #[test]
    fn the_file_stem_joins_the_instance_name() {
        assert_eq!("single-small-3", compiled().file_stem());
    }

    #[test]
    fn documents_are_written_as_text() {
        let xml = compiled().to_xml().expect("writing to memory succeeds");

        assert_eq!(
            "<instance format=\"XCSP3\" type=\"CSP\">\n  <variables>\n    <var id=\"x\"> 0..2 </var>\n  </variables>\n</instance>\n",
            xml
        );
    }
}
