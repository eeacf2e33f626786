use crate::store::Document;
use crate::store::Folder;
use crate::store::TreeNode;

/// Collect every markdown document below `folder` in depth-first pre-order.
///
/// Documents with any other extension are skipped. The order follows the
/// order of each folder's children and is not the final mix order.
pub fn collect_documents(folder: &Folder) -> Vec<Document> {
	let mut documents = Vec::new();
	collect_into(folder, &mut documents);
	documents
}

fn collect_into(folder: &Folder, documents: &mut Vec<Document>) {
	for child in &folder.children {
		match child {
			TreeNode::Document(document) if document.is_markdown() => {
				tracing::debug!(path = %document.path, "collected note");
				documents.push(document.clone());
			}
			TreeNode::Document(_) => {}
			TreeNode::Folder(folder) => collect_into(folder, documents),
		}
	}
}
