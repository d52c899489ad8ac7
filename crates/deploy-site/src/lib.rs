//! Hadoop-style configuration XML for Cluster Deployer
//!
//! Runtime properties of a running cluster are exported as a
//! `<configuration>` document, one `<property>` per entry:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <?xml-stylesheet type="text/xsl" href="configuration.xsl"?>
//! <configuration>
//!   <property>
//!     <name>fs.default.name</name>
//!     <value>hdfs://10.0.0.1:8020</value>
//!   </property>
//! </configuration>
//! ```
//!
//! The same format is read back by [`read`] and [`SiteDocument::parse`].

pub mod document;
pub mod error;

pub use document::{RuntimeProperties, STYLESHEET, SiteDocument, export, read};
pub use error::{Error, Result};
