/// Formats `type(scope): message`, dropping the parentheses when there is no scope.
pub fn build_commit_message(change_type: &str, scope: &str, message: &str) -> String {
    if scope.is_empty() {
        format!("{}: {}", change_type, message)
    } else {
        format!("{}({}): {}", change_type, scope, message)
    }
}

pub fn is_blank(message: &str) -> bool {
    message.trim().is_empty()
}
