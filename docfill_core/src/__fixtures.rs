use std::path::Path;
use std::path::PathBuf;

use docx_rs::Docx;
use docx_rs::Hyperlink;
use docx_rs::HyperlinkType;
use docx_rs::Paragraph;
use docx_rs::Run;
use docx_rs::Table;
use docx_rs::TableCell;
use docx_rs::TableRow;

use crate::AnyResult;
use crate::SubstitutionMap;

/// Body paragraphs of the procurement template used across the tests.
pub(crate) const PROCESSO_PARAGRAPHS: [&str; 4] = [
	"Processo administrativo nº ((DFD))",
	"Objeto da licitação: ((Objeto))",
	"Secretaria solicitante: (( Secretaria ))",
	"Valor Global: ((Valor)) (((ValorExtenso)))",
];

/// Text of the single table cell of the procurement template.
pub(crate) const PROCESSO_CELL: &str = "Data de Assinatura: ((Data1))";

/// Tags of the procurement template in scan order.
pub(crate) fn processo_tags() -> Vec<String> {
	[
		"DFD",
		"Objeto",
		"Secretaria",
		"Valor",
		"ValorExtenso",
		"Data1",
	]
	.into_iter()
	.map(String::from)
	.collect()
}

pub(crate) fn processo_data() -> SubstitutionMap {
	[
		("DFD", "038/2025"),
		("Objeto", "Aquisição de material de expediente"),
		("Secretaria", "Educação"),
		("Valor", "R$ 1.500,00"),
		("ValorExtenso", "mil e quinhentos reais"),
		("Data1", "17/10/2025"),
	]
	.into_iter()
	.collect()
}

pub(crate) fn processo_docx() -> Docx {
	let mut docx = Docx::new();
	for text in PROCESSO_PARAGRAPHS {
		docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
	}

	docx.add_table(Table::new(vec![TableRow::new(vec![
		TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(PROCESSO_CELL))),
	])]))
}

/// Paragraphs with hyperlinks: one between two runs and one holding a tag.
pub(crate) fn hyperlink_docx() -> Docx {
	Docx::new()
		.add_paragraph(
			Paragraph::new()
				.add_run(Run::new().add_text("Veja ((Lei)) em "))
				.add_hyperlink(
					Hyperlink::new("https://www.planalto.gov.br", HyperlinkType::External)
						.add_run(Run::new().add_text("[LINK]")),
				)
				.add_run(Run::new().add_text(" para detalhes.")),
		)
		.add_paragraph(
			Paragraph::new()
				.add_run(Run::new().add_text("Contato: "))
				.add_hyperlink(
					Hyperlink::new("mailto:licitacao@prefeitura.gov.br", HyperlinkType::External)
						.add_run(Run::new().add_text("((Email))")),
				),
		)
}

/// Write `docx` to `dir/name` and return the path.
pub(crate) fn write_docx(dir: &Path, name: &str, docx: Docx) -> AnyResult<PathBuf> {
	let path = dir.join(name);
	let file = std::fs::File::create(&path)?;
	docx.build().pack(file)?;
	Ok(path)
}

/// A `.docx` with one paragraph per entry of `paragraphs`.
pub(crate) fn write_paragraphs_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> AnyResult<PathBuf> {
	let mut docx = Docx::new();
	for text in paragraphs {
		docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
	}
	write_docx(dir, name, docx)
}

pub(crate) fn write_text(dir: &Path, name: &str, content: &str) -> AnyResult<PathBuf> {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(&path, content)?;
	Ok(path)
}

pub(crate) fn map(entries: &[(&str, &str)]) -> SubstitutionMap {
	entries.iter().map(|(key, value)| (*key, *value)).collect()
}
