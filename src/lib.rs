//! Landing Zone Forge
//!
//! A deterministic compiler from a landing-zone configuration document to
//! Terraform source files for IBM Cloud, plus the state machinery that
//! keeps the document internally consistent while it is edited.
//!
//! # Architecture Overview
//!
//! The system is a pipeline over one strongly typed JSON document:
//! - the document ([`config::Config`]) maps each entity family (VPCs,
//!   security groups, clusters, ...) to its instances, plus global options
//! - the state store ([`state::Store`]) owns the document and runs a fixed
//!   sequence of per-family hooks after every mutation, healing dangling
//!   cross-references and recomputing derived state
//! - the validation layer ([`validate`]) gates saves with pure per-family
//!   predicates and derives the list of currently invalid forms
//! - the compilers ([`tf`]) deterministically render each entity into
//!   Terraform text, and the assembler groups the output into named files
//!   and per-VPC module directories
//!
//! ## Key Properties
//!
//! - **Deterministic output**: compiling the same document twice yields
//!   byte-identical text; attribute order is explicit, never map order
//! - **Referential healing**: after any update pass no reference points at
//!   a deleted entity - renames rewrite references, deletes null or remove
//!   them
//! - **Explicit omission**: files backed by empty families are recorded as
//!   omitted, never emitted as empty strings
//!
//! # Core Modules
//!
//! - [`config`] - the document schema and seeded starter landing zone
//! - [`core`] - error types and the entity family registry
//! - [`state`] - the observable document store and cascade hooks
//! - [`tf`] - the compilation pipeline and file assembler
//! - [`validate`] - per-family save predicates and invalid-form derivation
//! - [`storage`] - persistence and provisioning collaborator traits
//! - [`cli`] - the `lzforge` command-line interface

pub mod cli;
pub mod config;
pub mod core;
pub mod state;
pub mod storage;
pub mod tf;
pub mod validate;
