//! Statements understood by the relstore shell, and the session that runs them.
//!
//! ```text
//! .decl edge(2) search 1        // relation with an index for lookups on column 1
//! .decl same(2) eqrel output    // equivalence relation
//! .decl done(0)                 // nullary flag
//! edge(1, 2).
//! same(1, 2).
//! done().
//! ```

use std::sync::Arc;

use relstore_core::tag::{RelationRepresentation, RelationTag};
use relstore_core::{
    DomainValue, OrderCatalog, Relation, RelationOptions, SearchSignature, StoreError,
};
use relstore_index::CatalogError;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    #[error("relation {0} is already declared")]
    Redeclared(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ScriptError>,
    },
}

fn syntax(message: impl Into<String>) -> ScriptError {
    ScriptError::Syntax(message.into())
}

/// A relation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub arity: usize,
    pub tags: Vec<RelationTag>,
    /// Search signatures the relation should keep an index for.
    pub searches: Vec<SearchSignature>,
}

impl Declaration {
    pub fn representation(&self) -> RelationRepresentation {
        self.tags
            .iter()
            .find_map(|tag| tag.representation())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Decl(Declaration),
    Fact {
        relation: String,
        values: Vec<DomainValue>,
    },
}

/// One component of a query pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPat {
    Wild,
    Value(DomainValue),
}

/// Parse one non-empty, non-comment line.
pub fn parse_statement(line: &str) -> Result<Statement, ScriptError> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(".decl") {
        return parse_decl(rest).map(Statement::Decl);
    }
    let Some(atom) = line.strip_suffix('.') else {
        return Err(syntax(format!("expected '.' after fact: {line}")));
    };
    let (relation, args) = split_atom(atom)?;
    let values = args
        .iter()
        .map(|arg| parse_value(arg))
        .collect::<Result<_, _>>()?;
    Ok(Statement::Fact {
        relation: relation.to_string(),
        values,
    })
}

fn parse_decl(rest: &str) -> Result<Declaration, ScriptError> {
    let rest = rest.trim();
    let close = rest
        .find(')')
        .ok_or_else(|| syntax("expected '(arity)' in declaration"))?;
    let (head, options) = rest.split_at(close + 1);
    let (name, args) = split_atom(head)?;
    let arity = match args.as_slice() {
        [] => 0,
        [n] => n
            .parse()
            .map_err(|_| syntax(format!("bad arity '{n}'")))?,
        _ => return Err(syntax("declaration takes a single arity")),
    };

    let mut tags = Vec::new();
    let mut searches = Vec::new();
    let mut words = options.split_whitespace();
    while let Some(word) = words.next() {
        if word.starts_with("//") {
            break;
        }
        if word == "search" {
            let columns = words
                .next()
                .ok_or_else(|| syntax("expected columns after 'search'"))?;
            searches.push(parse_columns(columns)?);
        } else {
            tags.push(word.parse::<RelationTag>()?);
        }
    }

    Ok(Declaration {
        name: name.to_string(),
        arity,
        tags,
        searches,
    })
}

fn parse_columns(columns: &str) -> Result<SearchSignature, ScriptError> {
    columns
        .split(',')
        .map(|col| {
            col.trim()
                .parse::<usize>()
                .ok()
                .filter(|&c| c < relstore_index::MAX_ARITY)
                .ok_or_else(|| syntax(format!("bad column '{col}'")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(SearchSignature::from_columns)
}

/// Split `name(a, b, ...)` into the name and trimmed arguments.
fn split_atom(atom: &str) -> Result<(&str, Vec<&str>), ScriptError> {
    let atom = atom.trim();
    let open = atom
        .find('(')
        .ok_or_else(|| syntax(format!("expected '(' in {atom}")))?;
    let inner = atom[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| syntax(format!("expected ')' at end of {atom}")))?;
    let name = atom[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(syntax(format!("bad relation name '{name}'")));
    }
    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };
    Ok((name, args))
}

fn parse_value(arg: &str) -> Result<DomainValue, ScriptError> {
    arg.parse()
        .map_err(|_| syntax(format!("expected an integer, got '{arg}'")))
}

/// Parse a query like `path(1, _)` into the relation name and pattern.
pub fn parse_query(input: &str) -> Result<(&str, Vec<QueryPat>), ScriptError> {
    let (name, args) = split_atom(input)?;
    let pats = args
        .iter()
        .map(|arg| match *arg {
            "_" => Ok(QueryPat::Wild),
            value => parse_value(value).map(QueryPat::Value),
        })
        .collect::<Result<_, _>>()?;
    Ok((name, pats))
}

/// Values and bound columns of a query pattern.
pub fn pattern_signature(pats: &[QueryPat]) -> (Vec<DomainValue>, SearchSignature) {
    let mut values = Vec::with_capacity(pats.len());
    let mut signature = SearchSignature::EMPTY;
    for (col, pat) in pats.iter().enumerate() {
        match pat {
            QueryPat::Wild => values.push(0),
            QueryPat::Value(v) => {
                values.push(*v);
                signature = signature.with(col);
            }
        }
    }
    (values, signature)
}

/// Declared relations and their contents.
#[derive(Debug)]
pub struct Session {
    relations: FxHashMap<String, Relation>,
    block_size: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(relstore_core::BLOCK_SIZE)
    }
}

impl Session {
    pub fn new(block_size: usize) -> Self {
        Self {
            relations: FxHashMap::default(),
            block_size,
        }
    }

    /// Run every statement of `source`, stopping at the first error.
    pub fn eval_source(&mut self, source: &str) -> Result<(), ScriptError> {
        for (i, line) in source.lines().enumerate() {
            self.eval_line(line).map_err(|source| ScriptError::Line {
                line: i + 1,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }

    /// Run one line. Blank lines and `//` comments are skipped.
    pub fn eval_line(&mut self, line: &str) -> Result<(), ScriptError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            return Ok(());
        }
        let statement = parse_statement(line)?;
        self.execute(statement)
    }

    pub fn execute(&mut self, statement: Statement) -> Result<(), ScriptError> {
        match statement {
            Statement::Decl(decl) => self.declare(decl),
            Statement::Fact { relation, values } => {
                let rel = self
                    .relations
                    .get_mut(&relation)
                    .ok_or(ScriptError::UnknownRelation(relation))?;
                rel.try_insert(&values)?;
                Ok(())
            }
        }
    }

    fn declare(&mut self, decl: Declaration) -> Result<(), ScriptError> {
        if self.relations.contains_key(&decl.name) {
            return Err(ScriptError::Redeclared(decl.name));
        }
        let catalog = OrderCatalog::from_signatures(decl.arity, decl.searches.iter().copied())?;
        let options = RelationOptions {
            block_size: self.block_size,
            ..RelationOptions::for_representation(decl.representation())
        };
        let mut relation = Relation::try_with_options(decl.arity, Arc::new(catalog), options)?;
        relation.set_level(self.relations.len());
        debug!(
            name = %decl.name,
            arity = decl.arity,
            representation = %decl.representation(),
            "declared relation"
        );
        self.relations.insert(decl.name, relation);
        Ok(())
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    fn relation_mut(&mut self, name: &str) -> Result<&mut Relation, ScriptError> {
        self.relations
            .get_mut(name)
            .ok_or_else(|| ScriptError::UnknownRelation(name.to_string()))
    }

    /// Declared relation names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.relations.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// Merge the tuples of `src` into `dst`. Returns how many tuples `dst`
    /// grew by.
    pub fn merge(&mut self, dst: &str, src: &str) -> Result<usize, ScriptError> {
        if dst == src {
            let target = self.relation_mut(dst)?;
            let source = target.clone();
            return Ok(target.insert_all(&source));
        }
        let source = self
            .relations
            .remove(src)
            .ok_or_else(|| ScriptError::UnknownRelation(src.to_string()))?;
        let merged = self.merge_from(dst, &source);
        self.relations.insert(src.to_string(), source);
        merged
    }

    fn merge_from(&mut self, dst: &str, source: &Relation) -> Result<usize, ScriptError> {
        let target = self.relation_mut(dst)?;
        if target.arity() != source.arity() {
            return Err(StoreError::ArityMismatch {
                expected: target.arity(),
                actual: source.arity(),
            }
            .into());
        }
        Ok(target.insert_all(source))
    }

    pub fn purge(&mut self, name: &str) -> Result<(), ScriptError> {
        self.relation_mut(name)?.purge();
        Ok(())
    }

    /// Forget every relation.
    pub fn clear(&mut self) {
        self.relations.clear();
    }
}
