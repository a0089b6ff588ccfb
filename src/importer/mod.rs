// ==========================================
// 空压机节能改造 - 导入层
// ==========================================
// 职责: 外部表格导入,生成领域记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod table_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{field_keys, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use table_importer::TableImporter;
