use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::char,
    combinator::map,
    multi::many0,
    sequence::delimited,
    IResult,
};

use crate::greek;
use crate::MarkupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// `&name;` with the name captured.
    Entity(&'a str),
    /// An `&` that does not open an entity.
    Amp,
}

fn entity(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(
            char('&'),
            take_while1(|c: char| c.is_ascii_alphabetic()),
            char(';'),
        ),
        Token::Entity,
    )(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
    map(is_not("&"), Token::Text)(input)
}

fn lone_amp(input: &str) -> IResult<&str, Token<'_>> {
    map(char('&'), |_| Token::Amp)(input)
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, MarkupError> {
    match many0(alt((entity, text, lone_amp)))(input) {
        Ok(("", tokens)) => Ok(tokens),
        Ok((rest, _)) => Err(MarkupError::Tokenize(rest.to_string())),
        Err(e) => Err(MarkupError::Tokenize(e.to_string())),
    }
}

/// Replace every entity with the output of `render`, failing on unknown names.
fn render_entities(
    input: &str,
    render: impl Fn(&greek::GreekLetter, &mut String),
) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(input.len());
    for token in tokenize(input)? {
        match token {
            Token::Text(t) => out.push_str(t),
            Token::Amp => out.push('&'),
            Token::Entity(name) => {
                let letter =
                    greek::by_entity(name).ok_or_else(|| MarkupError::UnknownEntity(name.to_string()))?;
                render(letter, &mut out);
            }
        }
    }
    Ok(out)
}

fn tags_to_brackets(s: &str) -> String {
    s.replace("<down>", "[[")
        .replace("</down>", "]]")
        .replace("<up>", "[")
        .replace("</up>", "]")
}

/// `&agr;` → `alpha`, `<up>1</up>` → `[1]`, `<down>2</down>` → `[[2]]`.
pub fn sgml_to_plain_text(input: &str) -> Result<String, MarkupError> {
    let spelled = render_entities(input, |l, out| out.push_str(l.plain))?;
    Ok(tags_to_brackets(&spelled))
}

/// `&agr;` → `α`. Super/subscript tags are left as they are.
pub fn sgml_to_unicode(input: &str) -> Result<String, MarkupError> {
    render_entities(input, |l, out| out.push(l.unicode))
}

/// `α` → `&agr;`; the inverse of [`sgml_to_unicode`] over the Greek table.
pub fn unicode_to_sgml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match greek::by_unicode(c) {
            Some(l) => {
                out.push('&');
                out.push_str(l.entity);
                out.push(';');
            }
            None => out.push(c),
        }
    }
    out
}

/// `α` → `alpha`, with super/subscript tags turned into brackets.
pub fn unicode_to_plain_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match greek::by_unicode(c) {
            Some(l) => out.push_str(l.plain),
            None => out.push(c),
        }
    }
    tags_to_brackets(&out)
}
