//! Page templates

pub const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Remix Blog{% endblock %}</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 0; background: #f4f4f4; color: #333; }
        .navbar { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #fff; border-bottom: 1px solid #ddd; }
        .navbar a { text-decoration: none; color: #333; margin-left: 1rem; }
        .container { max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
        .page-header { display: flex; justify-content: space-between; align-items: center; }
        .form-control { margin-bottom: 1rem; }
        .form-control input, .form-control textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
        .error { color: #c0392b; font-size: 0.9rem; }
        .btn { display: inline-block; padding: 0.5rem 1rem; background: #333; color: #fff; border: none; cursor: pointer; text-decoration: none; }
        .btn-reverse { background: #fff; color: #333; border: 1px solid #333; }
        .btn-block { width: 100%; }
        .btn-delete { background: #c0392b; }
        .posts-list { list-style: none; padding: 0; }
        .posts-list li { background: #fff; margin-bottom: 0.5rem; padding: 1rem; }
    </style>
</head>
<body>
    <nav class="navbar">
        <a href="/" class="logo">Remix</a>
        <div>
            <a href="/posts">Posts</a>
            {% if user %}
            <form action="/auth/logout" method="POST" style="display:inline">
                <button type="submit" class="btn">Logout {{ user.username }}</button>
            </form>
            {% else %}
            <a href="/auth/login">Login</a>
            {% endif %}
        </div>
    </nav>
    <div class="container">
        {% block content %}{% endblock %}
    </div>
</body>
</html>
"#;

pub const POSTS_INDEX: &str = r#"{% extends "layout.html" %}
{% block content %}
<div class="page-header">
    <h1>Posts</h1>
    <a href="/posts/new" class="btn">New Post</a>
</div>
{% if posts %}
<ul class="posts-list">
    {% for post in posts %}
    <li>
        <a href="/posts/{{ post.id }}"><h3>{{ post.title }}</h3></a>
        {{ post.created_at | date }}
    </li>
    {% endfor %}
</ul>
{% else %}
<p>No posts yet.</p>
{% endif %}
{% endblock %}
"#;

pub const POST_SHOW: &str = r#"{% extends "layout.html" %}
{% block title %}{{ post.title }}{% endblock %}
{% block content %}
<div class="page-header">
    <h1>{{ post.title }}</h1>
    <a href="/posts" class="btn btn-reverse">Back</a>
</div>
<div class="page-content">{{ post.body }}</div>
<p><small>{{ post.created_at | date }}</small></p>
{% if can_delete %}
<form method="POST">
    <input type="hidden" name="_method" value="delete">
    <button class="btn btn-delete">Delete</button>
</form>
{% endif %}
{% endblock %}
"#;

pub const POST_NEW: &str = r#"{% extends "layout.html" %}
{% block title %}New Post{% endblock %}
{% block content %}
<div class="page-header">
    <h1>New Post</h1>
    <a href="/posts" class="btn btn-reverse">Back</a>
</div>
<div class="page-content">
    <form method="POST">
        <div class="form-control">
            <label for="title">Title</label>
            <input type="text" name="title" id="title" value="{{ data.fields.title }}">
            <div class="error"><p>{{ data.fieldErrors.title }}</p></div>
        </div>
        <div class="form-control">
            <label for="body">Post Body</label>
            <textarea name="body" id="body">{{ data.fields.body }}</textarea>
            <div class="error"><p>{{ data.fieldErrors.body }}</p></div>
        </div>
        <button type="submit" class="btn btn-block">Add Post</button>
    </form>
</div>
{% endblock %}
"#;

pub const LOGIN: &str = r#"{% extends "layout.html" %}
{% block title %}Login{% endblock %}
{% block content %}
<div class="auth">
    <div class="page-header"><h1>Login</h1></div>
    <div class="page-content">
        <form method="POST">
            <fieldset>
                <legend>Login or Register</legend>
                <label>
                    <input type="radio" name="loginType" value="login"
                        {% if data.fields.loginType != "register" %}checked{% endif %}> Login
                </label>
                <label>
                    <input type="radio" name="loginType" value="register"
                        {% if data.fields.loginType == "register" %}checked{% endif %}> Register
                </label>
            </fieldset>
            <div class="form-control">
                <label for="username">Username</label>
                <input type="text" name="username" id="username" value="{{ data.fields.username }}">
                <div class="error">{{ data.fieldErrors.username }}</div>
            </div>
            <div class="form-control">
                <label for="password">Password</label>
                <input type="password" name="password" id="password">
                <div class="error">{{ data.fieldErrors.password }}</div>
            </div>
            {% if data.formError %}
            <div class="error"><p>{{ data.formError }}</p></div>
            {% endif %}
            <button class="btn btn-block" type="submit">Submit</button>
        </form>
    </div>
</div>
{% endblock %}
"#;

pub const LOGGED_OUT: &str = r#"{% extends "layout.html" %}
{% block title %}Logged out{% endblock %}
{% block content %}
<h1>You have been logged out</h1>
<p><a href="/posts">Back to posts</a> or <a href="/auth/login">log in again</a>.</p>
{% endblock %}
"#;
