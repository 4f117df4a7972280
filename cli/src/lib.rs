// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::{
    fmt, fs,
    io::{self, Write},
    path::PathBuf,
    str::FromStr,
    time::Instant,
};

use crypto::{
    hashers::{MiMC7, DEFAULT_SEED},
    verification::{verify_external_tree, ExternalTree},
    MerkleTree, MerkleTreeError, VerificationError,
};
use math::{fields::f254::BaseElement, ElementDecodingError};
use structopt::StructOpt;
use thiserror::Error;
use tracing::{debug, info};
use utils::Serializable;


// COMMAND-LINE OPTIONS
// ================================================================================================

#[derive(StructOpt, Debug)]
#[structopt(name = "mimc", about = "MiMC-7 hash and Merkle tree over the BN254 scalar field")]
pub struct MimcOptions {
    #[structopt(subcommand)]
    pub command: Command,

    /// Seed from which MiMC round constants are derived
    #[structopt(short = "s", long = "seed", default_value = "clearmatics_mt_seed")]
    pub seed: String,

    /// Format of printed field elements: dec or hex
    #[structopt(short = "f", long = "format", default_value = "dec")]
    pub format: OutputFormat,

    /// Print debug messages
    #[structopt(short = "v", long = "verbose")]
    pub verbose: bool,
}

impl MimcOptions {
    /// Returns a MiMC hasher instantiated with the seed specified by these options.
    pub fn hasher(&self) -> MiMC7 {
        MiMC7::new(self.seed.as_bytes())
    }
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Compute the MiMC hash of two field elements
    Hash {
        /// Left input (decimal or 0x-prefixed hex)
        x: BaseElement,
        /// Right input (decimal or 0x-prefixed hex)
        y: BaseElement,
    },
    /// Build a Merkle tree and print its nodes level by level
    Tree {
        /// Depth of the Merkle tree
        #[structopt(short = "d", long = "depth")]
        depth: usize,

        /// Print the root of the tree only
        #[structopt(long = "root-only")]
        root_only: bool,

        /// Write all nodes of the tree as 32-byte big-endian values into this file
        #[structopt(short = "o", long = "out", parse(from_os_str))]
        out: Option<PathBuf>,

        /// Leaf values; missing leaves are set to zero
        leaves: Vec<BaseElement>,
    },
    /// Print the authentication path of a leaf in a Merkle tree
    Path {
        /// Depth of the Merkle tree
        #[structopt(short = "d", long = "depth")]
        depth: usize,

        /// Index of the leaf
        #[structopt(short = "i", long = "index")]
        index: usize,

        /// Leaf values; missing leaves are set to zero
        leaves: Vec<BaseElement>,
    },
    /// Rebuild an externally reported Merkle tree and check all of its nodes
    Verify {
        /// File with the nodes of the tree in level order starting with the root
        #[structopt(parse(from_os_str))]
        file: PathBuf,

        /// Separately reported root of the tree
        #[structopt(short = "r", long = "root")]
        root: Option<BaseElement>,

        /// Read nodes as concatenated 32-byte big-endian values instead of one value per line
        #[structopt(short = "b", long = "binary")]
        binary: bool,
    },
    /// Check this build against known test vectors
    Vectors,
}

// OUTPUT FORMAT
// ================================================================================================

/// Textual representation of printed field elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Decimal,
    Hex,
}

impl OutputFormat {
    /// Renders the element in this format; hex values are printed as 32 big-endian bytes.
    pub fn render(&self, value: BaseElement) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::Hex => format!("0x{}", hex::encode(value.to_be_bytes())),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dec" => Ok(Self::Decimal),
            "hex" => Ok(Self::Hex),
            val => Err(format!("'{val}' is not a valid output format; expected dec or hex")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "dec"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

// ERRORS
// ================================================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("line {line}: '{value}' is not a valid field element: {source}")]
    InvalidNode {
        line: usize,
        value: String,
        source: ElementDecodingError,
    },
    #[error("invalid field element: {0}")]
    InvalidElement(#[from] ElementDecodingError),
    #[error(transparent)]
    Tree(#[from] MerkleTreeError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error("test vector '{name}' does not match: expected {expected}, but was {actual}")]
    VectorMismatch {
        name: &'static str,
        expected: String,
        actual: String,
    },
}

// COMMAND RUNNER
// ================================================================================================

/// Executes the command specified by the options and writes its output into `out`.
pub fn run<W: Write>(options: &MimcOptions, out: &mut W) -> Result<(), CliError> {
    let format = options.format;
    match &options.command {
        Command::Hash { x, y } => {
            let result = options.hasher().hash(*x, *y);
            writeln!(out, "{}", format.render(result))?;
        },
        Command::Tree { depth, root_only, out: file, leaves } => {
            let tree = build_tree(options.hasher(), leaves, *depth)?;
            if *root_only {
                writeln!(out, "{}", format.render(tree.root()))?;
            } else {
                for level in 0..=tree.depth() {
                    let nodes = tree.level(level).unwrap_or_default();
                    let values: Vec<String> = nodes.iter().map(|&v| format.render(v)).collect();
                    writeln!(out, "level {level}: {}", values.join(" "))?;
                }
            }
            if let Some(path) = file {
                fs::write(path, tree.to_bytes())
                    .map_err(|source| CliError::WriteFailed { path: path.clone(), source })?;
                info!("wrote {} nodes to {}", tree.nodes().len(), path.display());
            }
        },
        Command::Path { depth, index, leaves } => {
            let tree = build_tree(options.hasher(), leaves, *depth)?;
            let path = tree.prove(*index)?;
            for (level, sibling) in (1..=tree.depth()).rev().zip(path) {
                writeln!(out, "level {level}: {}", format.render(sibling))?;
            }
            writeln!(out, "root: {}", format.render(tree.root()))?;
        },
        Command::Verify { file, root, binary } => {
            let bytes = fs::read(file)
                .map_err(|source| CliError::ReadFailed { path: file.clone(), source })?;
            let mut external: ExternalTree<BaseElement> = if *binary {
                ExternalTree::read_from_bytes(&bytes)?
            } else {
                ExternalTree::from_nodes(parse_nodes(&String::from_utf8_lossy(&bytes))?, None)?
            };
            if let Some(root) = root {
                external = external.with_root(*root);
            }

            let now = Instant::now();
            let tree = verify_external_tree(options.hasher(), &external)?;
            debug!(
                "verified tree of depth {} in {} ms",
                tree.depth(),
                now.elapsed().as_millis()
            );
            writeln!(
                out,
                "verified {} nodes; root: {}",
                tree.nodes().len(),
                format.render(tree.root())
            )?;
        },
        Command::Vectors => {
            for (name, expected, actual) in check_vectors()? {
                if expected != actual {
                    return Err(CliError::VectorMismatch {
                        name,
                        expected: format.render(expected),
                        actual: format.render(actual),
                    });
                }
                writeln!(out, "{name}: ok")?;
            }
        },
    }
    Ok(())
}

// HELPER FUNCTIONS
// ================================================================================================

fn build_tree(
    hasher: MiMC7,
    leaves: &[BaseElement],
    depth: usize,
) -> Result<MerkleTree<MiMC7>, CliError> {
    let now = Instant::now();
    let tree = MerkleTree::with_leaves(hasher, leaves.to_vec(), depth)?;
    debug!(
        "built Merkle tree of depth {} from {} leaves in {} ms",
        depth,
        leaves.len(),
        now.elapsed().as_millis()
    );
    Ok(tree)
}

/// Parses one field element per line; blank lines and lines starting with `#` are skipped.
fn parse_nodes(source: &str) -> Result<Vec<BaseElement>, CliError> {
    let mut nodes = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value = line.parse().map_err(|source| CliError::InvalidNode {
            line: i + 1,
            value: line.to_string(),
            source,
        })?;
        nodes.push(value);
    }
    Ok(nodes)
}

/// Returns (name, expected, actual) triples for the known test vectors. The vectors are always
/// computed with the default seed.
fn check_vectors() -> Result<Vec<(&'static str, BaseElement, BaseElement)>, CliError> {
    let hasher = MiMC7::new(DEFAULT_SEED);
    let mut result = Vec::new();

    let x: BaseElement =
        "3703141493535563179657531719960160174296085208671919316200479060314459804651".parse()?;
    let y: BaseElement =
        "15683951496311901749339509118960676303290224812129752890706581988986633412003".parse()?;
    let expected: BaseElement =
        "16797922449555994684063104214233396200599693715764605878168345782964540311877".parse()?;
    result.push(("mimc7 hash", expected, hasher.hash(x, y)));

    let expected: BaseElement =
        "270777001950854254078089445239328322944945835429516501695156901778250529970".parse()?;
    result.push(("round constant 1", expected, hasher.round_constants()[1]));

    // all nodes at the same level of an empty tree are equal
    let tree = MerkleTree::new(hasher, 3)?;
    let empty_tree = [
        (
            "empty tree level 2",
            2,
            "14099405974798296289089207144580827488086367232485193855461335777570080506647",
        ),
        (
            "empty tree level 1",
            1,
            "18994625108571498039763404178311223352138299208457461470344693108622989074396",
        ),
        (
            "empty tree root",
            0,
            "2441541000495724811029127871318798691502895708150678885895101469991191938081",
        ),
    ];
    for (name, level, value) in empty_tree {
        let actual = tree.level(level).and_then(|nodes| nodes.last()).copied().unwrap_or_default();
        result.push((name, value.parse::<BaseElement>()?, actual));
    }

    Ok(result)
}
