pub mod cluster;
pub mod config;
pub mod deployment;
pub mod endpoint;
pub mod health;
pub mod helm;
pub mod ingress;
pub mod kustomization;
pub mod namespace;
pub mod node;
pub mod pod;
pub mod report;
pub mod validate;
