use crate::config::job::{
    CleanConfig, DateRangeConfig, DivideConfig, GenerateConfig, Job, MergeConfig, PivotConfig,
    SplitConfig,
};
use crate::core::parser::parse_table;
use crate::core::serializer::{encode_output, OutputFormat};
use crate::core::transform::{clean, dates, emails, generator, merge, pivot, split};
use crate::core::{Pipeline, Storage};
use crate::domain::model::{
    file_name, FileDescriptor, NamedTable, Output, Source, Table, TransformResult,
};
use crate::utils::error::{Result, SheetError};
use std::collections::HashSet;

/// Runs one [`Job`]: read and parse its inputs, apply the tool, write the
/// artifacts through `storage`.
pub struct ToolPipeline<S: Storage> {
    storage: S,
    job: Job,
}

impl<S: Storage> ToolPipeline<S> {
    pub fn new(storage: S, job: Job) -> Self {
        Self { storage, job }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }
}

/// Extension used for outputs derived from `input`: spreadsheets stay
/// spreadsheets, everything else becomes csv.
fn derived_extension(input: &str) -> &'static str {
    OutputFormat::from_file_name(input).extension()
}

fn tables(sources: Vec<Source>) -> Result<Vec<FileDescriptor>> {
    sources
        .into_iter()
        .map(|source| match source {
            Source::Table(file) => Ok(file),
            Source::Text { name, .. } => Err(SheetError::UnsupportedFileError {
                path: name,
                reason: "Expected a .csv, .xlsx or .xls file".to_string(),
            }),
        })
        .collect()
}

fn single_table(sources: Vec<Source>) -> Result<FileDescriptor> {
    tables(sources)?
        .into_iter()
        .next()
        .ok_or_else(|| SheetError::ValidationError {
            message: "No file uploaded".to_string(),
        })
}

/// `{stem}{ext}`, or `{stem}_2{ext}`, `{stem}_3{ext}`, ... when that name
/// was already handed out.
fn unique_name(used: &mut HashSet<String>, stem: &str, ext: &str) -> String {
    let mut candidate = format!("{}{}", stem, ext);
    let mut counter = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}{}", stem, counter, ext);
        counter += 1;
    }
    candidate
}

fn run_merge(config: &MergeConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let files = tables(sources)?;

    let (table, warnings) = match config.mode {
        merge::MergeMode::Concatenate => {
            let outcome = merge::concatenate(&files, config.skip_empty_rows)?;
            let warnings = outcome
                .mismatched
                .iter()
                .map(|name| format!("Headers of {} differ from the first file", name))
                .collect();
            (outcome.table, warnings)
        }
        merge::MergeMode::OuterUnion => {
            (merge::outer_union(&files, config.skip_empty_rows)?, Vec::new())
        }
    };

    tracing::info!("Merged {} file(s) into {} row(s)", files.len(), table.len());

    let output_file = format!("{}{}", config.output_name, config.format.extension());
    Ok(TransformResult {
        outputs: vec![Output::Table(NamedTable::new(output_file, table))],
        warnings,
        clean_summary: None,
    })
}

fn run_split(config: &SplitConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let mut outputs = Vec::new();
    let mut warnings = Vec::new();
    let mut archive_names = HashSet::new();

    for file in tables(sources)? {
        let base = file.base_name();
        let ext = derived_extension(&file.name);
        let chunks = split::split_by_chunk(&file.table, config.rows_per_chunk)?;
        if chunks.is_empty() {
            return Err(SheetError::ProcessingError {
                message: format!("{} has no data rows to split", file.name),
            });
        }

        tracing::info!("Split {} into {} file(s)", file.name, chunks.len());

        let stem = format!("{}_split", base);
        let archive_name = unique_name(&mut archive_names, &stem, ".zip");
        if archive_name != format!("{}.zip", stem) {
            warnings.push(format!(
                "Another input is also named {}; its chunks are saved as {}",
                file.name, archive_name
            ));
        }

        let entries = chunks
            .into_iter()
            .map(|chunk| {
                NamedTable::new(
                    format!("{}_rows_{}-{}{}", base, chunk.start, chunk.end, ext),
                    chunk.table,
                )
            })
            .collect();
        outputs.push(Output::Archive {
            file_name: archive_name,
            entries,
        });
    }

    Ok(TransformResult {
        outputs,
        warnings,
        clean_summary: None,
    })
}

fn run_divide(config: &DivideConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let mut entries: Vec<NamedTable> = Vec::new();
    let mut warnings = Vec::new();
    let mut entry_names = HashSet::new();

    // 每個檔案各自分類，不跨檔合併
    for file in tables(sources)? {
        let column = config
            .column_for(&file.name)
            .ok_or_else(|| SheetError::MissingConfigError {
                field: format!("category_column for {}", file.name),
            })?;
        let base = file.base_name();
        let ext = derived_extension(&file.name);
        let buckets = split::split_by_category(&file.table, column)?;

        tracing::info!(
            "Divided {} on '{}' into {} categor(ies)",
            file.name,
            column,
            buckets.len()
        );

        // 清理後同名的分類 (例如 "North/West" 與 "North West") 併入同一個檔案
        let mut merged: Vec<(String, Table)> = Vec::new();
        for bucket in buckets {
            let segment = split::sanitize_segment(&bucket.category);
            match merged.iter_mut().find(|(s, _)| *s == segment) {
                Some((_, table)) => table.rows.extend(bucket.table.rows),
                None => merged.push((segment, bucket.table)),
            }
        }

        for (segment, table) in merged {
            let stem = format!("{}_{}", base, segment);
            let entry_name = unique_name(&mut entry_names, &stem, ext);
            if entry_name != format!("{}{}", stem, ext) {
                warnings.push(format!(
                    "Another input is also named {}; saved {} instead of {}{}",
                    file.name, entry_name, stem, ext
                ));
            }
            entries.push(NamedTable::new(entry_name, table));
        }
    }

    Ok(TransformResult {
        outputs: vec![Output::Archive {
            file_name: format!("{}.zip", config.output_name),
            entries,
        }],
        warnings,
        clean_summary: None,
    })
}

fn run_clean(config: &CleanConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let file = single_table(sources)?;
    let (table, summary) = clean::clean(&file.table, config.options());

    tracing::info!(
        "Cleaned {}: rows {} -> {} (-{}), columns {} -> {} (-{})",
        file.name,
        summary.original_rows,
        summary.final_rows,
        summary.rows_removed(),
        summary.original_columns,
        summary.final_columns,
        summary.columns_removed()
    );

    Ok(TransformResult {
        outputs: vec![Output::Table(NamedTable::new(
            format!("{}_cleaned.csv", file.base_name()),
            table,
        ))],
        warnings: Vec::new(),
        clean_summary: Some(summary),
    })
}

fn run_pivot(config: &PivotConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let file = single_table(sources)?;
    let table = pivot::group_pivot(&file.table, &config.options()?)?;

    Ok(TransformResult::single(Output::Table(NamedTable::new(
        format!("{}{}", config.output_name, config.format.extension()),
        table,
    ))))
}

fn run_extract(sources: Vec<Source>) -> Result<TransformResult> {
    let (name, text) = match sources.into_iter().next() {
        Some(Source::Text { name, text }) => (name, text),
        Some(Source::Table(file)) => {
            return Err(SheetError::UnsupportedFileError {
                path: file.name,
                reason: "Expected a .txt file".to_string(),
            })
        }
        None => {
            return Err(SheetError::ValidationError {
                message: "No file uploaded".to_string(),
            })
        }
    };

    let found = emails::extract_emails(&text);
    if found.is_empty() {
        return Err(SheetError::NoEmailsFoundError { path: name });
    }

    tracing::info!("Found {} unique email address(es) in {}", found.len(), name);

    let timestamp = chrono::Utc::now().timestamp_millis();
    Ok(TransformResult::single(Output::Text {
        file_name: format!("extracted_emails_{}.txt", timestamp),
        content: found.join("\n"),
    }))
}

fn run_generate(config: &GenerateConfig, sources: Vec<Source>) -> Result<TransformResult> {
    let file = single_table(sources)?;
    let table = generator::generate_emails(&file.table, &config.options()?)?;

    tracing::info!(
        "Generated {} address(es) from {} row(s)",
        table.len(),
        file.table.len()
    );

    Ok(TransformResult::single(Output::Table(NamedTable::new(
        format!("{}_emails.csv", file.base_name()),
        table,
    ))))
}

fn run_date_range(config: &DateRangeConfig) -> Result<TransformResult> {
    let table: Table = dates::date_range(config.start, config.end)?;

    Ok(TransformResult::single(Output::Table(NamedTable::new(
        format!("{}{}", config.output_name, config.format.extension()),
        table,
    ))))
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ToolPipeline<S> {
    async fn extract(&self) -> Result<Vec<Source>> {
        let mut sources = Vec::new();

        // 依序讀取，確保解析順序與輸入順序一致
        for path in self.job.inputs() {
            tracing::debug!("Reading {}", path);
            let bytes = self.storage.read_file(path).await?;
            let name = file_name(path);

            let source = match &self.job {
                Job::ExtractEmails(_) => {
                    if bytes.is_empty() {
                        return Err(SheetError::EmptyInputError {
                            path: path.to_string(),
                        });
                    }
                    Source::Text {
                        name,
                        text: String::from_utf8_lossy(&bytes).into_owned(),
                    }
                }
                _ => Source::Table(FileDescriptor::new(name, parse_table(path, bytes)?)),
            };
            sources.push(source);
        }

        Ok(sources)
    }

    async fn transform(&self, sources: Vec<Source>) -> Result<TransformResult> {
        match &self.job {
            Job::Merge(config) => run_merge(config, sources),
            Job::Split(config) => run_split(config, sources),
            Job::Divide(config) => run_divide(config, sources),
            Job::Clean(config) => run_clean(config, sources),
            Job::Pivot(config) => run_pivot(config, sources),
            Job::ExtractEmails(_) => run_extract(sources),
            Job::GenerateEmails(config) => run_generate(config, sources),
            Job::DateRange(config) => run_date_range(config),
        }
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        // 全部編碼成功後才寫入，避免留下部分輸出
        let encoded = result
            .outputs
            .iter()
            .map(|output| Ok((output.file_name(), encode_output(output)?)))
            .collect::<Result<Vec<(&str, Vec<u8>)>>>()?;

        let mut written = Vec::with_capacity(encoded.len());
        for (name, data) in encoded {
            tracing::debug!("Writing {} ({} bytes) to storage", name, data.len());
            self.storage.write_file(name, &data).await?;
            written.push(name.to_string());
        }

        Ok(written)
    }
}
