use crate::definition::Block;
use crate::error::ConversionError;
use ahash::AHashMap;

/// Key under which a `for_loop` block nests its body.
pub const LOOP_BLOCKS: &str = "loop_blocks";

/// A block split into what its own node carries and what is laid out inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub payload: Block,
    pub children: Vec<Block>,
}

impl Expansion {
    pub fn leaf(payload: Block) -> Self {
        Self {
            payload,
            children: Vec::new(),
        }
    }
}

/// Defines how one `block_type` maps onto graph nodes and back.
///
/// `collapse(expand(b))` must give back `b` for every block the shape accepts.
pub trait BlockShape: Send + Sync {
    fn block_type(&self) -> &str;

    fn expand(&self, block: &Block) -> Result<Expansion, ConversionError> {
        Ok(Expansion::leaf(block.clone()))
    }

    fn collapse(&self, payload: Block, children: Vec<Block>) -> Result<Block, ConversionError> {
        if children.is_empty() {
            Ok(payload)
        } else {
            Err(ConversionError::InvalidBlockConfig {
                label: payload.label,
                message: format!("'{}' blocks cannot contain nested blocks", self.block_type()),
            })
        }
    }
}

/// Container kind: the loop body becomes child nodes of the loop node.
pub struct ForLoopShape;

impl BlockShape for ForLoopShape {
    fn block_type(&self) -> &str {
        "for_loop"
    }

    fn expand(&self, block: &Block) -> Result<Expansion, ConversionError> {
        let mut payload = block.clone();
        let body = payload
            .config
            .remove(LOOP_BLOCKS)
            .ok_or_else(|| ConversionError::InvalidBlockConfig {
                label: block.label.clone(),
                message: format!("missing '{}'", LOOP_BLOCKS),
            })?;
        let children: Vec<Block> =
            serde_json::from_value(body).map_err(|e| ConversionError::InvalidBlockConfig {
                label: block.label.clone(),
                message: format!("'{}' is not a list of blocks: {}", LOOP_BLOCKS, e),
            })?;
        Ok(Expansion { payload, children })
    }

    fn collapse(&self, mut payload: Block, children: Vec<Block>) -> Result<Block, ConversionError> {
        let body =
            serde_json::to_value(&children).map_err(|e| ConversionError::InvalidBlockConfig {
                label: payload.label.clone(),
                message: e.to_string(),
            })?;
        payload.config.insert(LOOP_BLOCKS.to_string(), body);
        Ok(payload)
    }
}

/// Defines the leaf block shapes, their registration, and lookup by name.
macro_rules! define_leaf_shapes {
    ( $( ($struct_name:ident, $block_type:expr) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl BlockShape for $struct_name {
                fn block_type(&self) -> &str { $block_type }
            }
        )*

        pub(super) fn register_default_shapes(registry: &mut AHashMap<String, Box<dyn BlockShape>>) {
            $( registry.insert($block_type.to_string(), Box::new($struct_name)); )*
            registry.insert(ForLoopShape.block_type().to_string(), Box::new(ForLoopShape));
        }

        pub(super) fn create_shape_by_name(name: &str) -> Option<Box<dyn BlockShape>> {
            match name {
                $( $block_type => Some(Box::new($struct_name)), )*
                "for_loop" => Some(Box::new(ForLoopShape)),
                _ => None,
            }
        }
    };
}

define_leaf_shapes! {
    (TaskShape, "task"),
    (CodeShape, "code"),
    (TextPromptShape, "text_prompt"),
    (DownloadToS3Shape, "download_to_s3"),
    (UploadToS3Shape, "upload_to_s3"),
    (SendEmailShape, "send_email"),
    (FileUrlParserShape, "file_url_parser"),
    (ValidationShape, "validation"),
    (ActionShape, "action"),
    (NavigationShape, "navigation"),
    (ExtractionShape, "extraction"),
    (LoginShape, "login"),
    (WaitShape, "wait"),
    (FileDownloadShape, "file_download"),
}
