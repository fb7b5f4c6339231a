use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::Error;




/// The kinds of mesh element a value can be centered on.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum At {
    Node,
    Link,
    Patch,
    Corner,
    Face,
    Cell,
}

/// The kinds of element that join two other elements: links join nodes (and
/// separate patches), faces join corners (and separate cells).
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connector {
    Link,
    Face,
}




// ============================================================================
impl At {
    pub const ALL: [At; 6] = [At::Node, At::Link, At::Patch, At::Corner, At::Face, At::Cell];
    const NAMES: &'static [&'static str] = &["node", "link", "patch", "corner", "face", "cell"];

    pub fn as_str(&self) -> &'static str {
        match self {
            At::Node => "node",
            At::Link => "link",
            At::Patch => "patch",
            At::Corner => "corner",
            At::Face => "face",
            At::Cell => "cell",
        }
    }

    /// The plural used in adjacency attribute names, e.g. the `patches` in
    /// `patches_at_link`.
    ///
    pub fn plural(&self) -> &'static str {
        match self {
            At::Node => "nodes",
            At::Link => "links",
            At::Patch => "patches",
            At::Corner => "corners",
            At::Face => "faces",
            At::Cell => "cells",
        }
    }
}

impl Connector {
    pub const ALL: [Connector; 2] = [Connector::Link, Connector::Face];
    const NAMES: &'static [&'static str] = &["link", "face"];

    pub fn as_element(&self) -> At {
        match self {
            Connector::Link => At::Link,
            Connector::Face => At::Face,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.as_element().as_str()
    }

    pub fn plural(&self) -> &'static str {
        self.as_element().plural()
    }
}




// ============================================================================
impl FromStr for At {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|at| at.as_str() == s)
            .ok_or_else(|| Error::InvalidChoice {
                name: "at",
                value: s.to_string(),
                allowed: Self::NAMES,
            })
    }
}

impl FromStr for Connector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|connector| connector.as_str() == s)
            .ok_or_else(|| Error::InvalidChoice {
                name: "connector",
                value: s.to_string(),
                allowed: Self::NAMES,
            })
    }
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
