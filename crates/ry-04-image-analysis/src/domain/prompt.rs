//! Oracle request text.

/// Instruction sent with every image.
pub const ANALYSIS_PROMPT: &str = r#"Analyze the following image:
      Provide a JSON response with the following structure:
      {
        "isPhotoreal": boolean,
        "photoDescription": string,
        "listOfTags": [string] (choose from: ["Nature","Food","Travel","Sports","People","Pets","Art & Fashion"])
      }
      Ensure the image is not AI-generated or edited with editing tools when determining if it's photoreal. For it to be photoreal, it should look like a real photo taken with a camera."#;

/// Default content gateway.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Public URL of a content-addressed image.
pub fn image_url(gateway: &str, image_ref: &str) -> String {
    if gateway.ends_with('/') {
        format!("{}{}", gateway, image_ref)
    } else {
        format!("{}/{}", gateway, image_ref)
    }
}
