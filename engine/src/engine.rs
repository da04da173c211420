//! Engine façade.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use cham_compiler::{format_compiler_error, CompilerError, SchemaCompiler};
use cham_merger::{merge, FileLoader, MergedSchema, SchemaSource, MERGED_DOCUMENT};
use cham_mutation::{
    AnyMutation, BuildMutation, DeleteMutation, ForeignKeyChecker, InsertMutation,
    MutationFactory, MutationKind, RenderedMutation, UpdateMutation, Validator,
};
use cham_query::{Cancellation, Materializer, QueryBuilder, QueryResult, SqlExecutor};
use cham_registry::Schema;
use tracing::info;

use crate::config::{DebugLevel, EngineConfig};
use crate::error::{EngineError, EngineResult};

/// Tracing target of the SQL echo enabled by `DebugLevel`.
pub const SQL_TARGET: &str = "cham::sql";

const UNMAPPED_NOTE: &str =
    "note: could not map this error to a source file; line numbers refer to the merged schema";

/// Configures and creates an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    compiler: Option<Arc<dyn SchemaCompiler>>,
    mutation_factory: Option<Arc<dyn MutationFactory>>,
    foreign_keys: Option<Arc<dyn ForeignKeyChecker>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compiler(mut self, compiler: Arc<dyn SchemaCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn mutation_factory(mut self, factory: Arc<dyn MutationFactory>) -> Self {
        self.mutation_factory = Some(factory);
        self
    }

    /// Existence check used by the validator for foreign-key fields.
    pub fn foreign_key_checker(mut self, checker: Arc<dyn ForeignKeyChecker>) -> Self {
        self.foreign_keys = Some(checker);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EngineResult<Engine> {
        let compiler = self.compiler.ok_or(EngineError::CompilerNotConfigured)?;
        let mutations = self
            .mutation_factory
            .ok_or(EngineError::MutationFactoryNotConfigured)?;

        Ok(Engine {
            compiler,
            mutations,
            foreign_keys: self.foreign_keys,
            config: self.config,
            schema: None,
        })
    }
}

/// Owns the loaded schema and the collaborators that act on it.
pub struct Engine {
    compiler: Arc<dyn SchemaCompiler>,
    mutations: Arc<dyn MutationFactory>,
    foreign_keys: Option<Arc<dyn ForeignKeyChecker>>,
    config: EngineConfig,
    schema: Option<Arc<Schema>>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The loaded schema, if any.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    // ==================== Schema loading ====================

    /// Compile schema source text and make it the current schema.
    pub fn load_schema(&mut self, source: &str) -> EngineResult<Arc<Schema>> {
        let schema = self.compile_schema(source, |err| format_compiler_error(err, MERGED_DOCUMENT))?;
        Ok(self.install(schema, 1))
    }

    /// Merge several schema files, compile the result and make it current.
    ///
    /// Compiler errors are rewritten to point at the file and line they came
    /// from.
    pub fn load_schema_files(&mut self, sources: &[SchemaSource]) -> EngineResult<Arc<Schema>> {
        let merged = merge(sources)?;
        let schema = self.compile_schema(&merged.content, |err| remap_error(&merged, err))?;
        Ok(self.install(schema, merged.files.len()))
    }

    /// Load every `*.cham` file under `paths`.
    pub fn load_schema_paths<I, P>(&mut self, paths: I) -> EngineResult<Arc<Schema>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let sources = FileLoader::new(paths).load_all()?;
        self.load_schema_files(&sources)
    }

    fn compile_schema(
        &self,
        source: &str,
        render: impl Fn(&CompilerError) -> String,
    ) -> EngineResult<Schema> {
        if let Err(errors) = self.compiler.validate_schema(source) {
            return Err(EngineError::schema_rejected(errors.iter().map(&render).collect()));
        }

        let json = self
            .compiler
            .parse_schema(source)
            .map_err(|err| EngineError::schema_rejected(vec![render(&err)]))?;

        Ok(Schema::from_json(&json)?)
    }

    fn install(&mut self, schema: Schema, files: usize) -> Arc<Schema> {
        let schema = Arc::new(schema);
        info!(entities = schema.entity_count(), files, "schema loaded");
        self.schema = Some(Arc::clone(&schema));
        schema
    }

    fn require_schema(&self) -> EngineResult<&Arc<Schema>> {
        self.schema.as_ref().ok_or(EngineError::NoSchema)
    }

    /// DDL for the loaded schema.
    pub fn generate_migration(&self) -> EngineResult<String> {
        let schema = self.require_schema()?;
        let json = schema.to_json()?;
        Ok(self.compiler.generate_migration(&json)?)
    }

    // ==================== Queries ====================

    /// Start a query against `entity`.
    pub fn query(&self, entity: &str) -> QueryBuilder {
        QueryBuilder::new(entity)
    }

    /// Compile `query` and materialize it through `executor`.
    pub fn fetch<E>(
        &self,
        query: &QueryBuilder,
        executor: &mut E,
        cancel: &Cancellation,
    ) -> EngineResult<QueryResult>
    where
        E: SqlExecutor + ?Sized,
    {
        let schema = self.require_schema()?;
        let plan = query.compile(Some(schema.as_ref()), self.compiler.as_ref())?;

        if self.config.debug.includes(DebugLevel::Sql) {
            info!(target: SQL_TARGET, entity = query.entity(), sql = %plan.main_query, "main query");
            for (relation, template) in &plan.eager_queries {
                info!(target: SQL_TARGET, relation = %relation, sql = %template, "eager query");
            }
        }
        if self.config.debug.includes(DebugLevel::Explain) {
            info!(target: SQL_TARGET, query = ?query.build(), round_trips = plan.round_trips(), "plan");
        }

        let started = Instant::now();
        let result = Materializer::new(schema, executor).run(query.entity(), &plan, cancel)?;

        if self.config.debug.includes(DebugLevel::Trace) {
            info!(
                target: SQL_TARGET,
                entity = query.entity(),
                rows = result.len(),
                relations = result.relations.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "query materialized"
            );
        }

        Ok(result)
    }

    // ==================== Mutations ====================

    /// A validator over the loaded schema.
    pub fn validator(&self) -> EngineResult<Validator> {
        let schema = self.require_schema()?;
        let validator = Validator::new(Arc::clone(schema), self.config.validator);
        Ok(match &self.foreign_keys {
            Some(checker) => validator.with_foreign_key_checker(Arc::clone(checker)),
            None => validator,
        })
    }

    pub fn insert(&self, entity: &str) -> EngineResult<InsertMutation> {
        Ok(self.mutations.insert(self.validator()?, entity))
    }

    pub fn update(&self, entity: &str) -> EngineResult<UpdateMutation> {
        Ok(self.mutations.update(self.validator()?, entity))
    }

    pub fn delete(&self, entity: &str) -> EngineResult<DeleteMutation> {
        Ok(self.mutations.delete(self.validator()?, entity))
    }

    pub fn mutation(&self, kind: MutationKind, entity: &str) -> EngineResult<AnyMutation> {
        Ok(self.mutations.create(kind, self.validator()?, entity))
    }

    /// Build a mutation, echoing its SQL when asked to.
    pub fn render(&self, mutation: &dyn BuildMutation) -> EngineResult<RenderedMutation> {
        let rendered = mutation.build()?;
        if self.config.debug.includes(DebugLevel::Sql) {
            info!(
                target: SQL_TARGET,
                kind = %rendered.kind(),
                entity = mutation.entity(),
                sql = %rendered.sql,
                params = rendered.params.len(),
                "mutation"
            );
        }
        Ok(rendered)
    }
}

/// Render a compiler error against the merged document and map it back to
/// its source file.
fn remap_error(merged: &MergedSchema, err: &CompilerError) -> String {
    let message = format_compiler_error(err, MERGED_DOCUMENT);
    if merged.locate(&message).is_some() {
        merged.remap_message(&message)
    } else {
        format!("{}\n{}", message.trim_end(), UNMAPPED_NOTE)
    }
}
