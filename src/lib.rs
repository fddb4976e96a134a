//! tasklist - an offline-first task list client
//!
//! This library keeps a task list usable while the network comes and goes.
//! Tasks live on a remote REST service and are mirrored into a durable local
//! store; changes made while offline are queued in that store and replayed
//! once connectivity returns.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Application configuration management
//! * [`storage`] - Durable key/value storage for the task cache
//! * [`remote`] - Remote task service client
//! * [`connectivity`] - Connectivity state and reachability probing
//! * [`sync`] - Offline-first synchronization engine
//! * [`controller`] - Façade used by front ends

/// Configuration module for managing application settings
pub mod config;

/// Connectivity monitor and network reachability probe
pub mod connectivity;

/// Application constants and default values
pub mod constants;

/// Presentation-facing task list controller
pub mod controller;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Task data model
pub mod models;

/// Remote task service abstraction and REST client
pub mod remote;

/// Local storage layer for caching tasks
pub mod storage;

/// Synchronization engine for keeping local and remote data in sync
pub mod sync;

pub use models::Task;
